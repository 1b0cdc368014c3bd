use std::io::Write;
use std::path::Path;

use crate::problem::demand::{self, DemandRequest};
use crate::problem::direction::Direction;

use super::parse_error::ParseError;
use super::time_of_day;

pub const DEMAND_HEADERS: [&str; 4] = ["Arrival time", "Boarding stop", "Stops to go", "Direction"];

/// Parses a demand instance. The returned set is sorted by
/// (direction, arrival): producing the core's canonical ordering is this
/// loader's responsibility, whatever the file looked like.
pub fn parse_demand(text: &str) -> Result<Vec<DemandRequest>, ParseError> {
    let mut lines = text.lines().enumerate();

    let header = lines.next().ok_or(ParseError::InvalidHeader)?.1;
    if header.trim() != DEMAND_HEADERS.join(",") {
        return Err(ParseError::InvalidHeader);
    }

    let mut requests = Vec::new();
    for (index, raw) in lines {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            return Err(ParseError::FieldCount {
                line,
                expected: 4,
                found: fields.len(),
            });
        }

        let arrival = time_of_day::parse_seconds(fields[0]).ok_or_else(|| ParseError::InvalidTime {
            line,
            value: fields[0].to_owned(),
        })?;
        let boarding_stop: usize = fields[1].parse().map_err(|_| ParseError::InvalidNumber {
            line,
            value: fields[1].to_owned(),
        })?;
        let stops_to_ride: u32 = fields[2].parse().map_err(|_| ParseError::InvalidNumber {
            line,
            value: fields[2].to_owned(),
        })?;
        let direction =
            Direction::from_label(fields[3]).ok_or_else(|| ParseError::InvalidDirection {
                line,
                value: fields[3].to_owned(),
            })?;

        requests.push(DemandRequest::new(
            boarding_stop,
            arrival,
            stops_to_ride,
            direction,
        ));
    }

    demand::sort_canonically(&mut requests);
    Ok(requests)
}

pub fn read_demand<P: AsRef<Path>>(path: P) -> Result<Vec<DemandRequest>, ParseError> {
    let text = std::fs::read_to_string(&path).map_err(|source| ParseError::Io {
        path: path.as_ref().to_path_buf(),
        source,
    })?;
    parse_demand(&text)
}

pub fn write_demand<W: Write>(writer: &mut W, demand: &[DemandRequest]) -> std::io::Result<()> {
    writeln!(writer, "{}", DEMAND_HEADERS.join(","))?;
    for request in demand {
        writeln!(
            writer,
            "{},{},{},{}",
            time_of_day::format_seconds(request.arrival()),
            request.boarding_stop(),
            request.stops_to_ride(),
            request.direction().label(),
        )?;
    }
    Ok(())
}

pub fn save_demand<P: AsRef<Path>>(path: P, demand: &[DemandRequest]) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    write_demand(&mut buffer, demand)?;
    std::fs::write(path, buffer)
}
