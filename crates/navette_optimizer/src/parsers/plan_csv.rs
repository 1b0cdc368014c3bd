use std::io::Write;
use std::path::Path;

use crate::problem::direction::Direction;
use crate::problem::plan::Plan;
use crate::problem::trip::Trip;

use super::parse_error::ParseError;
use super::time_of_day;

pub const PLAN_HEADERS: [&str; 3] = ["Direction", "Departure Time", "Duration (minutes)"];

pub fn write_plan<W: Write>(writer: &mut W, plan: &Plan) -> std::io::Result<()> {
    writeln!(writer, "{}", PLAN_HEADERS.join(","))?;
    for trip in plan {
        writeln!(
            writer,
            "{},{},{}",
            trip.direction().label(),
            time_of_day::format_seconds(trip.departure()),
            trip.duration() / 60,
        )?;
    }
    Ok(())
}

pub fn save_plan<P: AsRef<Path>>(path: P, plan: &Plan) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    write_plan(&mut buffer, plan)?;
    std::fs::write(path, buffer)
}

pub fn parse_plan(text: &str) -> Result<Plan, ParseError> {
    let mut lines = text.lines().enumerate();

    let header = lines.next().ok_or(ParseError::InvalidHeader)?.1;
    if header.trim() != PLAN_HEADERS.join(",") {
        return Err(ParseError::InvalidHeader);
    }

    let mut trips = Vec::new();
    for (index, raw) in lines {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(ParseError::FieldCount {
                line,
                expected: 3,
                found: fields.len(),
            });
        }

        let direction =
            Direction::from_label(fields[0]).ok_or_else(|| ParseError::InvalidDirection {
                line,
                value: fields[0].to_owned(),
            })?;
        let departure = time_of_day::parse_seconds(fields[1]).ok_or_else(|| {
            ParseError::InvalidTime {
                line,
                value: fields[1].to_owned(),
            }
        })?;
        let minutes: i64 = fields[2].parse().map_err(|_| ParseError::InvalidNumber {
            line,
            value: fields[2].to_owned(),
        })?;

        trips.push(Trip::new(departure, minutes * 60, direction));
    }

    Ok(Plan::from_trips(trips))
}

pub fn read_plan<P: AsRef<Path>>(path: P) -> Result<Plan, ParseError> {
    let text = std::fs::read_to_string(&path).map_err(|source| ParseError::Io {
        path: path.as_ref().to_path_buf(),
        source,
    })?;
    parse_plan(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_parse_round_trip() {
        let plan = Plan::from_trips(vec![
            Trip::new(7 * 3600, 600, Direction::Outbound),
            Trip::new(7 * 3600 + 1800, 600, Direction::Inbound),
        ]);

        let mut buffer = Vec::new();
        write_plan(&mut buffer, &plan).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with("Direction,Departure Time,Duration (minutes)\n"));
        assert!(text.contains("outbound,07:00:00,10"));

        let reparsed = parse_plan(&text).unwrap();
        assert_eq!(reparsed, plan);
    }

    #[test]
    fn test_rejects_bad_header() {
        assert!(matches!(
            parse_plan("Departure,Direction\n"),
            Err(ParseError::InvalidHeader)
        ));
    }

    #[test]
    fn test_rejects_bad_duration() {
        let text = "Direction,Departure Time,Duration (minutes)\noutbound,07:00:00,ten\n";
        assert!(matches!(
            parse_plan(text),
            Err(ParseError::InvalidNumber { line: 2, .. })
        ));
    }
}
