use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

use settings::{ApiSettings, AuthSettings, RendererSettings, SettingsStore};
use tracing_subscriber::{
    filter::filter_fn, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
    Layer,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application metadata trait.
///
/// Define your application's identity by implementing this trait.
/// This is a pure marker trait - no logic, just constants.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
}

/// Application infrastructure context.
///
/// Contains the data directory, the settings store with all sections
/// registered, version info, and the logging infrastructure.
pub struct AppContext {
    data_dir: PathBuf,
    settings: Arc<SettingsStore>,
    version: &'static str,
    /// Must be kept alive for the duration of the application so log
    /// messages are properly flushed.
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl AppContext {
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    pub fn version(&self) -> &'static str {
        self.version
    }
}

/// Builder performing the common initialization: data directory resolution,
/// logging (file + console), settings store with registered sections.
pub struct AppBuilder<A: Application> {
    context: AppContext,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    pub fn new(version: &'static str) -> Result<Self, BoxError> {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(A::APP_ID);
        let log_dir = data_dir.join("logs");
        std::fs::create_dir_all(&log_dir)?;

        let file_appender =
            tracing_appender::rolling::daily(&log_dir, format!("{}.log", A::APP_ID));
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        #[cfg(debug_assertions)]
        let level = LevelFilter::INFO;
        #[cfg(not(debug_assertions))]
        let level = LevelFilter::WARN;

        let file_layer = fmt::Layer::default()
            .with_target(false)
            .with_ansi(false)
            .with_writer(non_blocking)
            .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

        let console_layer = fmt::Layer::default()
            .with_target(false)
            .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

        tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer)
            .init();

        let settings = Arc::new(
            SettingsStore::builder()
                .with_settings_file(data_dir.join("settings.ron"))
                .build()?,
        );
        settings.register::<RendererSettings>()?;
        settings.register::<ApiSettings>()?;
        settings.register::<AuthSettings>()?;

        Ok(Self {
            context: AppContext {
                data_dir,
                settings,
                version,
                _log_guard: guard,
            },
            _marker: PhantomData,
        })
    }

    pub fn build(self) -> AppContext {
        self.context
    }
}
