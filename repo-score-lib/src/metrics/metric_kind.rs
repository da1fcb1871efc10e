use strum::{Display, EnumIter};

/// The sub-metrics that make up the net score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum MetricKind {
    License,
    Correctness,
    Responsiveness,
    RampUp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display_names() {
        let names: Vec<_> = MetricKind::iter().map(|k| k.to_string()).collect();
        assert_eq!(names, ["license", "correctness", "responsiveness", "ramp-up"]);
    }
}
