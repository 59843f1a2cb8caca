//! Customer, time window, and site types.

use serde::{Deserialize, Serialize};

use crate::distance::euclidean;

/// A time window `[ready, due]` within which service must start.
///
/// The vehicle may arrive before `ready` and wait; service starting after
/// `due` is infeasible. The window is stored as given: a window with
/// `ready > due` is representable so that an unsatisfiable instance can be
/// reported by the solver instead of rejected at load time.
///
/// # Examples
///
/// ```
/// use mihmds::models::TimeWindow;
///
/// let tw = TimeWindow::new(100.0, 200.0);
/// assert!(tw.is_well_formed());
/// assert_eq!(tw.waiting_time(80.0), 20.0);
/// assert!(tw.is_violated(250.0));
/// assert!(!TimeWindow::new(100.0, 50.0).is_well_formed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    ready: f64,
    due: f64,
}

impl TimeWindow {
    /// Creates a time window.
    pub fn new(ready: f64, due: f64) -> Self {
        Self { ready, due }
    }

    /// A window open from time zero with no practical closing time.
    pub fn unbounded() -> Self {
        Self::new(0.0, f64::MAX)
    }

    /// Earliest service start.
    pub fn ready(&self) -> f64 {
        self.ready
    }

    /// Latest service start.
    pub fn due(&self) -> f64 {
        self.due
    }

    /// Returns `true` if both bounds are finite and `ready <= due`.
    pub fn is_well_formed(&self) -> bool {
        self.ready.is_finite() && self.due.is_finite() && self.ready <= self.due
    }

    /// Waiting time if arriving at `arrival`; zero when on time or late.
    pub fn waiting_time(&self, arrival: f64) -> f64 {
        if arrival < self.ready {
            self.ready - arrival
        } else {
            0.0
        }
    }

    /// Returns `true` if service starting at `start` violates this window.
    pub fn is_violated(&self, start: f64) -> bool {
        start > self.due
    }
}

/// A customer (or the depot) of a VRPTW instance.
///
/// Customers are immutable once loaded. The depot is a customer-shaped
/// record with zero demand and zero service time whose window spans the
/// planning horizon.
///
/// # Examples
///
/// ```
/// use mihmds::models::Customer;
///
/// let depot = Customer::depot(35.0, 35.0, 230.0);
/// assert_eq!(depot.demand(), 0);
/// assert_eq!(depot.time_window().due(), 230.0);
///
/// let c = Customer::new(1, 41.0, 49.0, 10, 10.0).with_time_window(161.0, 171.0);
/// assert_eq!(c.id(), 1);
/// assert_eq!(c.time_window().ready(), 161.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: usize,
    x: f64,
    y: f64,
    demand: u32,
    service_time: f64,
    time_window: TimeWindow,
}

impl Customer {
    /// Creates a customer with an unbounded time window.
    pub fn new(id: usize, x: f64, y: f64, demand: u32, service_time: f64) -> Self {
        Self {
            id,
            x,
            y,
            demand,
            service_time,
            time_window: TimeWindow::unbounded(),
        }
    }

    /// Creates a depot (id 0) open over `[0, horizon]`.
    pub fn depot(x: f64, y: f64, horizon: f64) -> Self {
        Self::new(0, x, y, 0, 0.0).with_time_window(0.0, horizon)
    }

    /// Sets the service time window.
    pub fn with_time_window(mut self, ready: f64, due: f64) -> Self {
        self.time_window = TimeWindow::new(ready, due);
        self
    }

    /// Customer ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Units delivered at this stop.
    pub fn demand(&self) -> u32 {
        self.demand
    }

    /// Service duration.
    pub fn service_time(&self) -> f64 {
        self.service_time
    }

    /// Service time window.
    pub fn time_window(&self) -> TimeWindow {
        self.time_window
    }

    /// Euclidean distance to another customer.
    pub fn distance_to(&self, other: &Customer) -> f64 {
        euclidean(self.x, self.y, other.x, other.y)
    }

    /// Copies the primitive fields the evaluator needs.
    pub fn site(&self) -> Site {
        Site {
            x: self.x,
            y: self.y,
            demand: self.demand,
            ready: self.time_window.ready(),
            due: self.time_window.due(),
            service: self.service_time,
        }
    }
}

/// Primitive per-stop data consumed by the schedule walk.
///
/// A flat `Copy` record so that kernels such as the tail-exchange search can
/// run over plain arrays of sites, independent of [`Customer`] and the
/// solution representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// X-coordinate.
    pub x: f64,
    /// Y-coordinate.
    pub y: f64,
    /// Demand.
    pub demand: u32,
    /// Window opening.
    pub ready: f64,
    /// Window closing.
    pub due: f64,
    /// Service duration.
    pub service: f64,
}

impl Site {
    /// The service window of this site.
    #[inline]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.ready, self.due)
    }

    /// Euclidean distance to another site.
    #[inline]
    pub fn distance_to(&self, other: &Site) -> f64 {
        euclidean(self.x, self.y, other.x, other.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_bounds() {
        let tw = TimeWindow::new(10.0, 20.0);
        assert_eq!(tw.ready(), 10.0);
        assert_eq!(tw.due(), 20.0);
        assert!(tw.is_well_formed());
    }

    #[test]
    fn test_time_window_malformed() {
        assert!(!TimeWindow::new(20.0, 10.0).is_well_formed());
        assert!(!TimeWindow::new(f64::NAN, 10.0).is_well_formed());
        assert!(!TimeWindow::new(10.0, f64::INFINITY).is_well_formed());
    }

    #[test]
    fn test_site_window_drives_schedule_checks() {
        let c = Customer::new(5, 1.0, 2.0, 3, 4.0).with_time_window(30.0, 60.0);
        let window = c.site().window();
        assert_eq!(window, c.time_window());
        assert_eq!(window.waiting_time(10.0), 20.0);
        assert!(!window.is_violated(60.0));
        assert!(window.is_violated(60.5));
    }

    #[test]
    fn test_time_window_waiting() {
        let tw = TimeWindow::new(10.0, 20.0);
        assert!((tw.waiting_time(5.0) - 5.0).abs() < 1e-10);
        assert_eq!(tw.waiting_time(10.0), 0.0);
        assert_eq!(tw.waiting_time(15.0), 0.0);
    }

    #[test]
    fn test_time_window_violated() {
        let tw = TimeWindow::new(10.0, 20.0);
        assert!(!tw.is_violated(20.0));
        assert!(tw.is_violated(20.1));
    }

    #[test]
    fn test_customer_defaults() {
        let c = Customer::new(3, 10.0, 20.0, 5, 3.0);
        assert_eq!(c.id(), 3);
        assert_eq!(c.demand(), 5);
        assert_eq!(c.service_time(), 3.0);
        assert_eq!(c.time_window(), TimeWindow::unbounded());
    }

    #[test]
    fn test_depot() {
        let d = Customer::depot(35.0, 35.0, 1000.0);
        assert_eq!(d.id(), 0);
        assert_eq!(d.demand(), 0);
        assert_eq!(d.service_time(), 0.0);
        assert_eq!(d.time_window().ready(), 0.0);
        assert_eq!(d.time_window().due(), 1000.0);
    }

    #[test]
    fn test_site_copies_fields() {
        let c = Customer::new(1, 1.0, 2.0, 7, 4.0).with_time_window(5.0, 9.0);
        let s = c.site();
        assert_eq!((s.x, s.y, s.demand), (1.0, 2.0, 7));
        assert_eq!((s.ready, s.due, s.service), (5.0, 9.0, 4.0));
    }

    #[test]
    fn test_distance_symmetric() {
        let a = Customer::new(1, 1.0, 2.0, 0, 0.0);
        let b = Customer::new(2, 4.0, 6.0, 0, 0.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-12);
        assert!((a.site().distance_to(&b.site()) - 5.0).abs() < 1e-10);
    }
}
