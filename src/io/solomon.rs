//! Solomon benchmark format.
//!
//! ```text
//! C101
//!
//! VEHICLE
//! NUMBER     CAPACITY
//!   25         200
//!
//! CUSTOMER
//! CUST NO.  XCOORD.   YCOORD.    DEMAND   READY TIME  DUE DATE   SERVICE   TIME
//!
//!     0      40         50          0          0       1236          0
//!     1      45         68         10        912        967         90
//! ```
//!
//! The first data row is the depot; its due date is the planning horizon.

use std::path::Path;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::LoadError;
use crate::models::{Customer, Instance};

/// A parsed benchmark instance.
#[derive(Debug, Clone)]
pub struct SolomonInstance {
    /// Instance name from the first non-empty line.
    pub name: String,
    /// Fleet size declared in the file (not enforced by the solver).
    pub fleet_size: usize,
    /// Depot, customers, and capacity.
    pub instance: Instance,
}

/// Reads and parses a Solomon instance file.
///
/// With `limit`, only the first `limit` customers are kept.
pub fn load_solomon(path: impl AsRef<Path>, limit: Option<usize>) -> Result<SolomonInstance, LoadError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_solomon(&content, limit)
}

/// Parses Solomon-format text.
///
/// Rows with fewer than seven fields are skipped with a warning; a field
/// that is present but not a number is an error.
///
/// # Examples
///
/// ```
/// use mihmds::io::parse_solomon;
///
/// let text = "\
/// TINY
///
/// VEHICLE
/// NUMBER     CAPACITY
///   2          50
///
/// CUSTOMER
/// CUST NO.  XCOORD.   YCOORD.    DEMAND   READY TIME  DUE DATE   SERVICE   TIME
///
///     0      0          0          0          0       1000          0
///     1      3          4         10          0        500         10
///     2      6          8         20        100        600         10
/// ";
/// let parsed = parse_solomon(text, None).unwrap();
/// assert_eq!(parsed.name, "TINY");
/// assert_eq!(parsed.fleet_size, 2);
/// assert_eq!(parsed.instance.capacity(), 50);
/// assert_eq!(parsed.instance.num_customers(), 2);
/// assert_eq!(parsed.instance.depot().time_window().due(), 1000.0);
/// ```
pub fn parse_solomon(content: &str, limit: Option<usize>) -> Result<SolomonInstance, LoadError> {
    let mut lines = content.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));

    let name = lines
        .clone()
        .map(|(_, l)| l)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string();

    // VEHICLE, then the NUMBER CAPACITY header, then the values
    lines
        .by_ref()
        .find(|(_, l)| l.eq_ignore_ascii_case("VEHICLE"))
        .ok_or(LoadError::MissingSection("VEHICLE"))?;
    let (line, fleet_row) = lines
        .by_ref()
        .filter(|(_, l)| !l.is_empty())
        .find(|(_, l)| l.split_whitespace().next().is_some_and(|t| t.parse::<u64>().is_ok()))
        .ok_or(LoadError::MissingSection("VEHICLE"))?;
    let mut fields = fleet_row.split_whitespace();
    let fleet_size: usize = field(line, fields.next(), "vehicle number")?;
    let capacity: u32 = field(line, fields.next(), "vehicle capacity")?;

    lines
        .by_ref()
        .find(|(_, l)| l.starts_with("CUST"))
        .ok_or(LoadError::MissingSection("CUSTOMER"))?;

    let mut depot = None;
    let mut customers = Vec::new();

    for (line, row) in lines {
        if row.is_empty() || row.starts_with("CUST") {
            continue;
        }
        let parts: Vec<&str> = row.split_whitespace().collect();
        if parts.len() < 7 {
            warn!(line, row, "skipping short customer row");
            continue;
        }

        let id: usize = field(line, Some(parts[0]), "customer number")?;
        let x: f64 = field(line, Some(parts[1]), "x coordinate")?;
        let y: f64 = field(line, Some(parts[2]), "y coordinate")?;
        let demand: u32 = field(line, Some(parts[3]), "demand")?;
        let ready: f64 = field(line, Some(parts[4]), "ready time")?;
        let due: f64 = field(line, Some(parts[5]), "due date")?;
        let service: f64 = field(line, Some(parts[6]), "service time")?;

        if depot.is_none() {
            depot = Some(Customer::depot(x, y, due));
            continue;
        }
        if limit.is_some_and(|n| customers.len() >= n) {
            break;
        }
        customers.push(Customer::new(id, x, y, demand, service).with_time_window(ready, due));
    }

    let depot = depot.ok_or(LoadError::MissingSection("depot"))?;
    debug!(name = %name, customers = customers.len(), capacity, fleet_size, "instance loaded");
    let instance = Instance::new(depot, customers, capacity)?;
    Ok(SolomonInstance {
        name,
        fleet_size,
        instance,
    })
}

fn field<T: FromStr>(line: usize, token: Option<&str>, what: &str) -> Result<T, LoadError> {
    let token = token.ok_or_else(|| LoadError::Parse {
        line,
        message: format!("missing {what}"),
    })?;
    token.parse().map_err(|_| LoadError::Parse {
        line,
        message: format!("invalid {what} '{token}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const C_TINY: &str = "C_TINY

VEHICLE
NUMBER     CAPACITY
  25         200

CUSTOMER
CUST NO.  XCOORD.   YCOORD.    DEMAND   READY TIME  DUE DATE   SERVICE   TIME

    0      40         50          0          0       1236          0
    1      45         68         10        912        967         90
    2      45         70         30        825        870         90
    3      42         66         10         65        146         90
";

    #[test]
    fn test_parse_header_and_rows() {
        let parsed = parse_solomon(C_TINY, None).expect("valid");
        assert_eq!(parsed.name, "C_TINY");
        assert_eq!(parsed.fleet_size, 25);
        let inst = &parsed.instance;
        assert_eq!(inst.capacity(), 200);
        assert_eq!(inst.num_customers(), 3);
        assert_eq!(inst.depot().x(), 40.0);
        assert_eq!(inst.depot().time_window().due(), 1236.0);
        let c2 = inst.customer(2).expect("present");
        assert_eq!(c2.demand(), 30);
        assert_eq!(c2.time_window().ready(), 825.0);
        assert_eq!(c2.service_time(), 90.0);
    }

    #[test]
    fn test_limit_keeps_prefix() {
        let parsed = parse_solomon(C_TINY, Some(2)).expect("valid");
        let ids: Vec<usize> = parsed.instance.customers().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_short_rows_skipped() {
        let text = C_TINY.replace("    2      45         70         30        825        870         90\n", "    2  45 70\n");
        let parsed = parse_solomon(&text, None).expect("valid");
        assert_eq!(parsed.instance.num_customers(), 2);
        assert!(parsed.instance.customer(2).is_none());
    }

    #[test]
    fn test_bad_number_reports_line() {
        let text = C_TINY.replace("912", "nine");
        match parse_solomon(&text, None) {
            Err(LoadError::Parse { line, message }) => {
                assert_eq!(line, 11);
                assert!(message.contains("ready time"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_sections() {
        assert!(matches!(
            parse_solomon("X\n", None),
            Err(LoadError::MissingSection("VEHICLE"))
        ));
        let no_customers = "X\nVEHICLE\nNUMBER CAPACITY\n 1 10\n";
        assert!(matches!(
            parse_solomon(no_customers, None),
            Err(LoadError::MissingSection("CUSTOMER"))
        ));
        let no_rows = "X\nVEHICLE\nNUMBER CAPACITY\n 1 10\nCUSTOMER\nCUST NO.\n";
        assert!(matches!(
            parse_solomon(no_rows, None),
            Err(LoadError::MissingSection("depot"))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_solomon("/nonexistent/instance.txt", None),
            Err(LoadError::Io(_))
        ));
    }
}
