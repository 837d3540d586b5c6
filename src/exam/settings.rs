use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Settings {
    pub question_count: usize,
    pub duration: Duration,
    pub time_warnings: Vec<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            question_count: 65,
            duration: Duration::from_secs(90 * 60),
            time_warnings: vec![Duration::from_secs(10 * 60), Duration::from_secs(60)],
        }
    }
}
