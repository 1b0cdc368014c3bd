/// Parses a solver timeout (e.g., "30s", "5m", "PT1H30M").
pub fn parse_duration(text: &str) -> Result<jiff::SignedDuration, String> {
    text.parse().map_err(|error| format!("{error}"))
}

/// A parsed `--legs` value: travel times in seconds, one per route leg.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegList(pub Vec<i64>);

/// Parses a comma-separated list of leg travel times in minutes.
pub fn parse_legs(text: &str) -> Result<LegList, String> {
    text.split(',')
        .map(|field| {
            let minutes: i64 = field
                .trim()
                .parse()
                .map_err(|_| format!("invalid leg duration '{field}'"))?;
            if minutes <= 0 {
                return Err(format!("leg duration must be positive, got '{field}'"));
            }
            Ok(minutes * 60)
        })
        .collect::<Result<_, _>>()
        .map(LegList)
}
