use std::{io, path::Path};

use tracing_subscriber::{
    Layer, filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

#[cfg(not(debug_assertions))]
pub use release::init_subscriber;

#[cfg(debug_assertions)]
pub fn init_subscriber(_local_env_dir: Option<&Path>) -> io::Result<()> {
    use tracing_subscriber::filter::LevelFilter;

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .pretty()
                .with_writer(io::stderr)
                .with_filter(filter),
        )
        .try_init()
        .map_err(io::Error::other)
}

#[cfg(not(debug_assertions))]
mod release {
    use super::*;
    use crate::{
        CRATE_NAME, LOG_ONLY,
        utils::display::{BLUE, GREEN, MAGENTA, RED, RESET, YELLOW},
    };

    use tracing::{Event, Level, Subscriber};
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{
        filter::DynFilterFn,
        fmt::{
            FmtContext,
            format::{FormatEvent, FormatFields, PrettyFields, Writer},
        },
        registry::LookupSpan,
    };

    const MAX_LOG_FILES: usize = 5;

    /// Wraps an event format. Panic reports are written as their bare message, since [`DisplayPanic`] already
    /// carries the location. With `color` set every other event is tinted by its level.
    ///
    /// [`DisplayPanic`]: crate::utils::display::DisplayPanic
    struct ProbeLogFormat<E> {
        inner: E,
        color: bool,
    }

    fn level_color(level: &Level) -> &'static str {
        match *level {
            Level::ERROR => RED,
            Level::WARN => YELLOW,
            Level::INFO => GREEN,
            Level::DEBUG => BLUE,
            Level::TRACE => MAGENTA,
        }
    }

    impl<S, N, E> FormatEvent<S, N> for ProbeLogFormat<E>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
        N: for<'a> FormatFields<'a> + 'static,
        E: FormatEvent<S, N>,
    {
        fn format_event(
            &self,
            ctx: &FmtContext<'_, S, N>,
            mut writer: Writer<'_>,
            event: &Event<'_>,
        ) -> std::fmt::Result {
            let meta = event.metadata();
            let (start, end) = if self.color {
                (level_color(meta.level()), RESET)
            } else {
                ("", "")
            };
            write!(writer, "{start}")?;

            if meta.name() == "PANIC" {
                ctx.field_format().format_fields(writer.by_ref(), event)?;
                writeln!(writer, "{end}")
            } else {
                self.inner.format_event(ctx, writer.by_ref(), event)?;
                write!(writer, "{end}")
            }
        }
    }

    fn app_filter() -> EnvFilter {
        EnvFilter::new(format!("{CRATE_NAME}=info"))
    }

    /// Release builds log to a daily rolling file inside `local_env_dir` and print everything not named
    /// [`LOG_ONLY`] to stderr. Without a `local_env_dir` only the console layer is installed.
    pub fn init_subscriber(local_env_dir: Option<&Path>) -> io::Result<()> {
        let file_layer = match local_env_dir {
            Some(dir) => {
                let appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .filename_prefix(format!("{CRATE_NAME}.log"))
                    .max_log_files(MAX_LOG_FILES)
                    .build(dir)
                    .map_err(io::Error::other)?;

                Some(
                    fmt::layer()
                        .event_format(ProbeLogFormat {
                            inner: fmt::format().with_target(false).with_ansi(false),
                            color: false,
                        })
                        .fmt_fields(PrettyFields::new())
                        .with_writer(appender)
                        .with_filter(app_filter()),
                )
            }
            None => None,
        };

        let console_layer = fmt::layer()
            .event_format(ProbeLogFormat {
                inner: fmt::format()
                    .with_target(false)
                    .without_time()
                    .with_level(false),
                color: true,
            })
            .with_writer(io::stderr)
            .with_filter(app_filter())
            .with_filter(DynFilterFn::new(|meta, _| meta.name() != LOG_ONLY));

        tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer)
            .try_init()
            .map_err(io::Error::other)
    }
}
