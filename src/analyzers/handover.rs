use std::collections::HashSet;

use crate::config::PipelineConfig;

/// Finds a landmark stop near the middle of a long route.
#[derive(Debug, Clone)]
pub struct HandoverLocator {
    /// Landmark names, uppercased.
    landmarks: HashSet<String>,
    start_fraction: f64,
    end_fraction: f64,
}

impl HandoverLocator {
    pub fn new<I>(landmarks: I, start_fraction: f64, end_fraction: f64) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            landmarks: landmarks
                .into_iter()
                .map(|l| l.as_ref().to_uppercase())
                .collect(),
            start_fraction,
            end_fraction,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            &config.landmarks,
            config.window_start_fraction,
            config.window_end_fraction,
        )
    }

    /// Half-open index window `[floor(n * start), floor(n * end))`, clamped to `n`.
    pub fn window(&self, n: usize) -> (usize, usize) {
        let start = (n as f64 * self.start_fraction).floor() as usize;
        let end = ((n as f64 * self.end_fraction).floor() as usize).min(n);
        (start.min(end), end)
    }

    /// Returns the last landmark inside the midpoint window, as spelled in
    /// the stop sequence.
    pub fn locate<'a>(&self, stops: &'a [String]) -> Option<&'a str> {
        let (start, end) = self.window(stops.len());
        stops[start..end]
            .iter()
            .rev()
            .find(|stop| self.landmarks.contains(&stop.to_uppercase()))
            .map(String::as_str)
    }
}
