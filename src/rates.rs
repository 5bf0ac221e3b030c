//! Standard rate table used when no site-specific price list is supplied.
//!
//! Figures are per meter of cable run: material cost in euros and crew time
//! in hours.

use crate::model::MaterialClass;
use crate::traits::{MaterialRates, RateTable};

const AERIAL: MaterialRates = MaterialRates::new(500.0, 2.0);
const SEMI_AERIAL: MaterialRates = MaterialRates::new(750.0, 4.0);
const CONDUIT: MaterialRates = MaterialRates::new(900.0, 5.0);

/// Fixed lookup table for the three material classes.
#[derive(Debug, Clone)]
pub struct StandardRates {
    pub aerial: MaterialRates,
    pub semi_aerial: MaterialRates,
    pub conduit: MaterialRates,
}

impl Default for StandardRates {
    fn default() -> Self {
        Self {
            aerial: AERIAL,
            semi_aerial: SEMI_AERIAL,
            conduit: CONDUIT,
        }
    }
}

impl RateTable for StandardRates {
    fn rates_for(&self, material: MaterialClass) -> MaterialRates {
        match material {
            MaterialClass::Aerial => self.aerial,
            MaterialClass::SemiAerial => self.semi_aerial,
            MaterialClass::Conduit => self.conduit,
        }
    }
}
