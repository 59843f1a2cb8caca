//! Problem instance: depot, customer catalog, and vehicle capacity.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::{InvalidReason, SolveError};

use super::{Customer, Site};

/// A VRPTW instance.
///
/// Owns the depot and the customer catalog for the lifetime of a solve.
/// Customer ids are arbitrary `usize` values and are resolved to catalog
/// positions through a hash index.
///
/// # Examples
///
/// ```
/// use mihmds::models::{Customer, Instance};
///
/// let depot = Customer::depot(0.0, 0.0, 1000.0);
/// let customers = vec![
///     Customer::new(1, 3.0, 4.0, 10, 5.0),
///     Customer::new(2, 6.0, 8.0, 20, 5.0),
/// ];
/// let instance = Instance::new(depot, customers, 100).unwrap();
/// assert_eq!(instance.num_customers(), 2);
/// assert_eq!(instance.customer(2).map(|c| c.demand()), Some(20));
/// assert!(instance.customer(9).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    depot: Customer,
    customers: Vec<Customer>,
    capacity: u32,
    positions: HashMap<usize, usize>,
}

impl Instance {
    /// Creates an instance.
    ///
    /// Returns [`SolveError::InvalidInstance`] if a customer id appears twice.
    /// Field ranges are otherwise not validated here; unsatisfiable customers
    /// surface during construction.
    pub fn new(depot: Customer, customers: Vec<Customer>, capacity: u32) -> Result<Self, SolveError> {
        let mut positions = HashMap::with_capacity(customers.len());
        for (pos, c) in customers.iter().enumerate() {
            match positions.entry(c.id()) {
                Entry::Occupied(_) => {
                    return Err(SolveError::InvalidInstance {
                        customer_id: c.id(),
                        reason: InvalidReason::DuplicateId,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(pos);
                }
            }
        }
        Ok(Self {
            depot,
            customers,
            capacity,
            positions,
        })
    }

    /// The depot.
    pub fn depot(&self) -> &Customer {
        &self.depot
    }

    /// Customers in catalog (input) order.
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Vehicle capacity shared by the homogeneous fleet.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of customers (excluding the depot).
    pub fn num_customers(&self) -> usize {
        self.customers.len()
    }

    /// Catalog position of a customer id.
    #[inline]
    pub fn position(&self, id: usize) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Looks up a customer by id.
    #[inline]
    pub fn customer(&self, id: usize) -> Option<&Customer> {
        self.position(id).map(|p| &self.customers[p])
    }

    /// Primitive site data for a customer id.
    #[inline]
    pub fn site(&self, id: usize) -> Option<Site> {
        self.customer(id).map(Customer::site)
    }

    /// Flat site table: index 0 is the depot, index `p + 1` is the customer
    /// at catalog position `p`.
    pub fn site_table(&self) -> Vec<Site> {
        std::iter::once(self.depot.site())
            .chain(self.customers.iter().map(Customer::site))
            .collect()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Instance {
        let depot = Customer::depot(0.0, 0.0, 100.0);
        let customers = vec![
            Customer::new(4, 1.0, 0.0, 10, 0.0),
            Customer::new(2, 2.0, 0.0, 5, 0.0),
        ];
        Instance::new(depot, customers, 50).expect("valid")
    }

    #[test]
    fn test_lookup_by_id() {
        let inst = sample();
        assert_eq!(inst.position(4), Some(0));
        assert_eq!(inst.position(2), Some(1));
        assert_eq!(inst.position(3), None);
        assert_eq!(inst.position(99), None);
        assert_eq!(inst.customer(2).map(Customer::demand), Some(5));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let depot = Customer::depot(0.0, 0.0, 100.0);
        let customers = vec![
            Customer::new(1, 1.0, 0.0, 10, 0.0),
            Customer::new(1, 2.0, 0.0, 5, 0.0),
        ];
        let err = Instance::new(depot, customers, 50).unwrap_err();
        assert_eq!(
            err,
            SolveError::InvalidInstance {
                customer_id: 1,
                reason: InvalidReason::DuplicateId,
            }
        );
    }

    #[test]
    fn test_site_table_layout() {
        let inst = sample();
        let table = inst.site_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table[0], inst.depot().site());
        assert_eq!(table[1].x, 1.0);
        assert_eq!(table[2].demand, 5);
    }

    #[test]
    fn test_sparse_large_ids() {
        let depot = Customer::depot(0.0, 0.0, 100.0);
        let customers = vec![
            Customer::new(usize::MAX, 1.0, 0.0, 10, 0.0),
            Customer::new(1 << 40, 2.0, 0.0, 5, 0.0),
            Customer::new(7, 3.0, 0.0, 1, 0.0),
        ];
        let inst = Instance::new(depot, customers, 50).expect("valid");
        assert_eq!(inst.position(usize::MAX), Some(0));
        assert_eq!(inst.position(1 << 40), Some(1));
        assert_eq!(inst.position(7), Some(2));
        assert_eq!(inst.position((1 << 40) + 1), None);
        assert_eq!(inst.customer(1 << 40).map(Customer::demand), Some(5));

        let depot = Customer::depot(0.0, 0.0, 100.0);
        let twice = vec![
            Customer::new(usize::MAX, 1.0, 0.0, 1, 0.0),
            Customer::new(usize::MAX, 2.0, 0.0, 1, 0.0),
        ];
        assert!(matches!(
            Instance::new(depot, twice, 50),
            Err(SolveError::InvalidInstance {
                reason: InvalidReason::DuplicateId,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_catalog() {
        let inst = Instance::new(Customer::depot(0.0, 0.0, 10.0), vec![], 10).expect("valid");
        assert_eq!(inst.num_customers(), 0);
        assert!(inst.customer(0).is_none());
    }
}
