//! Format layer creation

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{Layer, Registry};

use crate::config::{DisplayConfig, Format};

pub(super) type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Apply the display switches shared by every format, then box.
///
/// Dropping the timer changes the layer's type, hence boxing in both arms.
macro_rules! finish_layer {
    ($layer:expr, $display:expr) => {{
        let layer = $layer
            .with_ansi($display.colors)
            .with_target($display.target)
            .with_file($display.source)
            .with_line_number($display.source)
            .with_thread_names($display.thread_names);
        if $display.time {
            layer.boxed()
        } else {
            layer.without_time().boxed()
        }
    }};
}

pub(super) fn make_layer(
    format: Format,
    display: &DisplayConfig,
    writer: BoxMakeWriter,
) -> BoxedLayer {
    let base = tracing_subscriber::fmt::layer::<Registry>().with_writer(writer);
    match format {
        Format::Pretty => finish_layer!(base.pretty(), display),
        Format::Compact => finish_layer!(base.compact(), display),
        Format::Json => finish_layer!(base.json().with_current_span(true), display),
    }
}
