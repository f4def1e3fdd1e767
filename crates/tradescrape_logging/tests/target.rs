use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use tradescrape_logging::{scrape_debug, scrape_warn, LOG_TARGET};

struct Capture {
    records: Mutex<Vec<(Level, String, String)>>,
}

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(mut records) = self.records.lock() {
            records.push((
                record.level(),
                record.target().to_string(),
                record.args().to_string(),
            ));
        }
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture {
    records: Mutex::new(Vec::new()),
};

#[test]
fn macros_log_under_the_shared_target() {
    log::set_logger(&CAPTURE).unwrap();
    log::set_max_level(LevelFilter::Trace);

    scrape_debug!("table {} closed", 2);
    scrape_warn!("row rejected");

    let records = CAPTURE.records.lock().unwrap();
    assert_eq!(
        *records,
        vec![
            (Level::Debug, LOG_TARGET.to_string(), "table 2 closed".to_string()),
            (Level::Warn, LOG_TARGET.to_string(), "row rejected".to_string()),
        ]
    );
}
