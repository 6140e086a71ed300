use chrono::Local;
use log::{LevelFilter, Record};
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::{Filter, Response};
use log4rs::Handle;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct LevelBandFilter {
    range_start: LevelFilter,
    range_end: LevelFilter,
}

impl LevelBandFilter {
    /// Accepts records whose level falls between the two bounds, in
    /// either order.
    pub fn new(range_start: LevelFilter, range_end: LevelFilter) -> LevelBandFilter {
        LevelBandFilter {
            range_start,
            range_end,
        }
    }
}

impl Filter for LevelBandFilter {
    fn filter(&self, record: &Record) -> Response {
        if (record.level() >= self.range_start && record.level() <= self.range_end)
            || (record.level() >= self.range_end && record.level() <= self.range_start)
        {
            Response::Accept
        } else {
            Response::Reject
        }
    }
}

fn band_appender(
    date: &str,
    band: &str,
    range_start: LevelFilter,
    range_end: LevelFilter,
) -> Result<Appender, Box<dyn std::error::Error>> {
    let size_trigger = SizeTrigger::new(10 * 1024 * 1024);
    let size_roller = FixedWindowRoller::builder()
        .build(&format!("logs/{}/{}.app.rotate.{{}}.log", date, band), 30)?;
    let policy = CompoundPolicy::new(Box::new(size_trigger), Box::new(size_roller));
    let appender = RollingFileAppender::builder()
        .append(true)
        .encoder(Box::new(PatternEncoder::new("{d}, {l}, {m}{n}")))
        .build(format!("logs/{}/{}.app.log", date, band), Box::new(policy))?;
    Ok(Appender::builder()
        .filter(Box::new(LevelBandFilter::new(range_start, range_end)))
        .build(format!("{}_rolling_file", band), Box::new(appender)))
}

// one rolling file per level band, split under logs/<date>/
pub fn setup_logger() -> Result<Handle, Box<dyn std::error::Error>> {
    let date = Local::now().format("%Y-%m-%d").to_string();
    let config = log4rs::config::runtime::ConfigBuilder::default()
        .appender(band_appender(
            &date,
            "debug",
            LevelFilter::Trace,
            LevelFilter::Debug,
        )?)
        .appender(band_appender(
            &date,
            "info",
            LevelFilter::Info,
            LevelFilter::Info,
        )?)
        .appender(band_appender(
            &date,
            "error",
            LevelFilter::Warn,
            LevelFilter::Error,
        )?)
        .build(
            Root::builder()
                .appender("debug_rolling_file")
                .appender("info_rolling_file")
                .appender("error_rolling_file")
                .build(LevelFilter::Trace),
        )?;

    let handle = log4rs::init_config(config)?;
    Ok(handle)
}
