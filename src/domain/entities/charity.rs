//! Static charity catalog offered on the options surface.

use serde::Serialize;

/// Charity selected when the user never made a choice.
pub const DEFAULT_CHARITY_ID: &str = "charity1";

/// A beneficiary the user can route affiliate revenue to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Charity {
    pub id: &'static str,
    pub name: &'static str,
    pub affiliate_id: &'static str,
}

pub const CHARITIES: &[Charity] = &[
    Charity {
        id: "charity1",
        name: "Global Wildlife Fund",
        affiliate_id: "gwf-20",
    },
    Charity {
        id: "charity2",
        name: "Children's Education",
        affiliate_id: "edu-20",
    },
    Charity {
        id: "charity3",
        name: "Local Food Bank",
        affiliate_id: "food-20",
    },
];

/// Looks up a catalog entry by id.
pub fn find_charity(id: &str) -> Option<&'static Charity> {
    CHARITIES.iter().find(|c| c.id == id)
}
