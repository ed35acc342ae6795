/// Process wide setup shared by all raymarch applications. Creating it more than once is fine, the
/// logger is only installed the first time.
pub struct Raymarch {}

static RAYMARCH_STATIC: std::sync::OnceLock<RaymarchStatic> = std::sync::OnceLock::new();

struct RaymarchStatic {}

impl RaymarchStatic {
    fn init(app_name: &str) -> &'static Self {
        RAYMARCH_STATIC.get_or_init(|| {
            env_logger::builder()
                .filter_level(log::LevelFilter::Info)
                .parse_default_env()
                .init();

            log::info!("Starting {}", app_name);
            Self {}
        })
    }
}

impl Raymarch {
    pub fn new(app_name: &str) -> Self {
        RaymarchStatic::init(app_name);

        Self {}
    }
}
