use serde::Serialize;

/// Expense category. Categories are fixed reference data and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub group: &'static str,
    /// Money set aside rather than spent. Excluded from total expenses.
    pub is_savings: bool,
}

pub const OTHER_ID: &str = "other";

const fn cat(id: &'static str, label: &'static str, icon: &'static str, group: &'static str) -> Category {
    Category {
        id,
        label,
        icon,
        group,
        is_savings: false,
    }
}

static CATEGORIES: [Category; 20] = [
    // Living & essentials
    cat("housing", "Housing & Rent", "home", "Living"),
    cat("utilities", "Utilities", "zap", "Living"),
    cat("groceries", "Groceries", "shopping-cart", "Living"),
    cat("food_dining", "Food & Dining", "utensils-crossed", "Living"),
    // Transport
    cat("transport", "Transportation", "car", "Transport"),
    cat("repairs_maintenance", "Repairs & Maintenance", "wrench", "Transport"),
    cat("fuel", "Fuel", "fuel", "Transport"),
    cat("parking", "Parking & Tolls", "circle-parking", "Transport"),
    // Shopping & lifestyle
    cat("shopping", "Shopping", "shopping-bag", "Lifestyle"),
    cat("entertainment", "Entertainment", "film", "Lifestyle"),
    cat("subscriptions", "Subscriptions", "credit-card", "Lifestyle"),
    cat("personal_care", "Personal Care", "sparkles", "Lifestyle"),
    // Health & family
    cat("health", "Health & Medical", "heart-pulse", "Health"),
    cat("gym", "Gym & Fitness", "dumbbell", "Health"),
    cat("education", "Education", "graduation-cap", "Health"),
    cat("insurance", "Insurance", "shield", "Health"),
    // Other
    cat("travel", "Travel", "plane", "Other"),
    cat("gifts_donations", "Gifts & Donations", "gift", "Other"),
    Category {
        id: "investments",
        label: "Investments & Savings",
        icon: "trending-up",
        group: "Other",
        is_savings: true,
    },
    cat(OTHER_ID, "Other", "ellipsis", "Other"),
];

/// Registry index by id. Must stay in sync with `CATEGORIES`.
static INDEX: phf::Map<&'static str, usize> = phf::phf_map! {
    "housing" => 0,
    "utilities" => 1,
    "groceries" => 2,
    "food_dining" => 3,
    "transport" => 4,
    "repairs_maintenance" => 5,
    "fuel" => 6,
    "parking" => 7,
    "shopping" => 8,
    "entertainment" => 9,
    "subscriptions" => 10,
    "personal_care" => 11,
    "health" => 12,
    "gym" => 13,
    "education" => 14,
    "insurance" => 15,
    "travel" => 16,
    "gifts_donations" => 17,
    "investments" => 18,
    "other" => 19,
};

/// All categories in registry order.
pub fn all() -> &'static [Category] {
    &CATEGORIES
}

pub fn get(id: &str) -> Option<&'static Category> {
    INDEX.get(id).map(|&i| &CATEGORIES[i])
}

/// Look up a category for display, falling back to "Other" for unknown ids.
pub fn get_or_other(id: &str) -> &'static Category {
    get(id).unwrap_or(&CATEGORIES[CATEGORIES.len() - 1])
}

pub fn is_known(id: &str) -> bool {
    INDEX.contains_key(id)
}

/// Unknown ids are treated as ordinary spending.
pub fn is_savings(id: &str) -> bool {
    get(id).is_some_and(|c| c.is_savings)
}

/// Registry position, used as a deterministic tie-breaker. Unknown ids sort last.
pub fn position(id: &str) -> usize {
    INDEX.get(id).copied().unwrap_or(usize::MAX)
}

/// Categories grouped for selects, groups in first-appearance order.
pub fn by_group() -> Vec<(&'static str, Vec<&'static Category>)> {
    let mut groups: Vec<(&'static str, Vec<&'static Category>)> = Vec::new();
    for category in CATEGORIES.iter() {
        match groups.iter_mut().find(|(g, _)| *g == category.group) {
            Some((_, members)) => members.push(category),
            None => groups.push((category.group, vec![category])),
        }
    }
    groups
}
