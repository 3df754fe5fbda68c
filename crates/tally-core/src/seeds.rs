//! Compiled-in seed data for the merchant lexicon and the categorizer
//!
//! Order matters in both tables:
//! - [`MERCHANT_SEEDS`]: when two display names normalize to the same key, the
//!   one declared first keeps it
//! - [`CATEGORY_RULES`]: one entry per category, in [`ExpenseCategory`] order

use crate::models::ExpenseCategory;

/// Canonical display names for one category
#[derive(Debug, Clone, Copy)]
pub struct SeedGroup {
    pub category: ExpenseCategory,
    pub names: &'static [&'static str],
}

/// Substring cues and free-text keywords for one category
#[derive(Debug, Clone, Copy)]
pub struct CategoryRules {
    pub category: ExpenseCategory,
    /// Matched against the normalized merchant key (+4 on any hit)
    pub merchant_cues: &'static [&'static str],
    /// Counted in the lowercased receipt text (+2 per hit, capped at +8)
    pub keywords: &'static [&'static str],
}

pub const MERCHANT_SEEDS: &[SeedGroup] = &[
    SeedGroup {
        category: ExpenseCategory::Groceries,
        names: &[
            "Loblaws",
            "No Frills",
            "Sobeys",
            "Metro",
            "Safeway",
            "Costco",
            "Whole Foods Market",
            "Trader Joe's",
            "Kroger",
            "FreshCo",
            "Food Basics",
            "Save-On-Foods",
            "Real Canadian Superstore",
            "T&T Supermarket",
            "Aldi",
            "Publix",
            "Wegmans",
            "Farm Boy",
            "Longo's",
            "IGA",
            "Provigo",
            "Maxi",
        ],
    },
    SeedGroup {
        category: ExpenseCategory::Coffee,
        names: &[
            "Starbucks",
            "Tim Hortons",
            "Second Cup",
            "Dunkin'",
            "Peet's Coffee",
            "Blue Bottle Coffee",
            "Balzac's Coffee",
            "Coffee Culture",
            "Caribou Coffee",
            "Dutch Bros",
        ],
    },
    SeedGroup {
        category: ExpenseCategory::Dining,
        names: &[
            "McDonald's",
            "Subway",
            "Burger King",
            "Wendy's",
            "A&W",
            "Chipotle",
            "Pizza Pizza",
            "Domino's",
            "Pizza Hut",
            "KFC",
            "Taco Bell",
            "Five Guys",
            "Harvey's",
            "Mary Brown's",
            "Swiss Chalet",
            "The Keg",
            "Boston Pizza",
            "Earls",
            "Cactus Club Cafe",
            "Chick-fil-A",
            "Panera Bread",
            "Popeyes",
        ],
    },
    SeedGroup {
        category: ExpenseCategory::Transport,
        names: &[
            "Uber",
            "Lyft",
            "Presto",
            "TTC",
            "GO Transit",
            "OC Transpo",
            "Compass Card",
            "Green P Parking",
            "Impark",
            "Indigo Park",
            "SpotHero",
        ],
    },
    SeedGroup {
        category: ExpenseCategory::Fuel,
        names: &[
            "Shell",
            "Esso",
            "Petro-Canada",
            "Chevron",
            "Husky",
            "Ultramar",
            "Pioneer",
            "Canadian Tire Gas+",
            "Costco Gas",
            "Mobil",
            "Exxon",
            "BP",
            "Sunoco",
            "Circle K",
            "Irving",
        ],
    },
    SeedGroup {
        category: ExpenseCategory::Shopping,
        names: &[
            "Walmart",
            "Target",
            "Amazon",
            "Canadian Tire",
            "Best Buy",
            "Winners",
            "Marshalls",
            "HomeSense",
            "IKEA",
            "Home Depot",
            "Lowe's",
            "Dollarama",
            "Staples",
            "Indigo",
            "Sport Chek",
            "Hudson's Bay",
            "Apple Store",
            "Old Navy",
            "H&M",
            "Uniqlo",
        ],
    },
    SeedGroup {
        category: ExpenseCategory::Utilities,
        names: &[
            "Hydro One",
            "Toronto Hydro",
            "BC Hydro",
            "Enbridge Gas",
            "FortisBC",
            "Rogers",
            "Bell",
            "Telus",
            "Fido",
            "Koodo",
            "Freedom Mobile",
            "Shaw",
            "Videotron",
            "Comcast",
            "Verizon",
            "AT&T",
        ],
    },
    SeedGroup {
        category: ExpenseCategory::Housing,
        names: &[
            "CAPREIT",
            "Minto Apartments",
            "Greenwin",
            "Realstar",
            "Boardwalk Rental Communities",
            "Mainstreet Equity",
            "Equity Residential",
            "Avalon Communities",
        ],
    },
    SeedGroup {
        category: ExpenseCategory::Entertainment,
        names: &[
            "Netflix",
            "Spotify",
            "Cineplex",
            "Disney+",
            "Crave",
            "Apple Music",
            "Steam",
            "PlayStation Store",
            "Xbox",
            "Ticketmaster",
            "AMC Theatres",
            "Landmark Cinemas",
            "YouTube Premium",
            "Nintendo eShop",
        ],
    },
    SeedGroup {
        category: ExpenseCategory::Travel,
        names: &[
            "Air Canada",
            "WestJet",
            "Porter Airlines",
            "Flair Airlines",
            "Delta Air Lines",
            "United Airlines",
            "American Airlines",
            "Marriott",
            "Hilton",
            "Hyatt",
            "Fairmont",
            "Holiday Inn",
            "Best Western",
            "Airbnb",
            "Expedia",
            "Booking.com",
            "Hertz",
            "Avis",
            "Enterprise Rent-A-Car",
            "Via Rail",
            "Amtrak",
        ],
    },
    SeedGroup {
        category: ExpenseCategory::Personal,
        names: &[
            "Shoppers Drug Mart",
            "Rexall",
            "London Drugs",
            "Walgreens",
            "CVS Pharmacy",
            "GoodLife Fitness",
            "Planet Fitness",
            "Sephora",
            "Great Clips",
            "First Choice Haircutters",
            "Lush",
        ],
    },
    SeedGroup {
        category: ExpenseCategory::Income,
        names: &[
            "Canada Revenue Agency",
            "Service Canada",
            "Payroll Deposit",
            "Interac e-Transfer",
        ],
    },
];

pub const CATEGORY_RULES: &[CategoryRules] = &[
    CategoryRules {
        category: ExpenseCategory::Groceries,
        merchant_cues: &["grocer", "market", "supermarket", "foods", "farm", "fresh", "superstore"],
        keywords: &[
            "produce", "bakery", "deli", "dairy", "organic", "grocery", "meat", "bananas",
            "milk", "eggs", "bread", "frozen",
        ],
    },
    CategoryRules {
        category: ExpenseCategory::Coffee,
        merchant_cues: &["coffee", "cafe", "espresso", "roaster", "bean"],
        keywords: &[
            "latte", "espresso", "cappuccino", "americano", "macchiato", "mocha", "cold brew",
            "frappuccino", "drip", "muffin", "croissant", "donut", "bagel", "chai",
        ],
    },
    CategoryRules {
        category: ExpenseCategory::Dining,
        merchant_cues: &[
            "grill", "pizza", "burger", "kitchen", "bistro", "diner", "restaurant", "sushi",
            "taco", "pub", "tavern", "eatery", "shawarma", "pho", "wings",
        ],
        keywords: &[
            "server", "guests", "dine in", "take out", "takeout", "entree", "appetizer", "combo",
            "fries", "burger", "pizza", "sandwich", "meal",
        ],
    },
    CategoryRules {
        category: ExpenseCategory::Transport,
        merchant_cues: &["parking", "park", "transit", "taxi", "cab", "uber", "lyft", "presto"],
        keywords: &[
            "trip", "fare", "ride", "parking", "transit", "driver", "pickup", "drop-off",
            "zone",
        ],
    },
    CategoryRules {
        category: ExpenseCategory::Fuel,
        merchant_cues: &["gas", "fuel", "petro", "oil", "station", "esso", "shell"],
        keywords: &[
            "unleaded", "diesel", "litre", "liter", "gallon", "pump", "octane", "fuel",
            "car wash",
        ],
    },
    CategoryRules {
        category: ExpenseCategory::Shopping,
        merchant_cues: &[
            "store", "mart", "depot", "outlet", "shop", "mall", "boutique", "warehouse",
            "hardware",
        ],
        keywords: &[
            "qty", "return policy", "exchange", "sku", "clearance", "size", "colour", "color",
            "electronics", "apparel",
        ],
    },
    CategoryRules {
        category: ExpenseCategory::Utilities,
        merchant_cues: &[
            "hydro", "energy", "power", "electric", "telecom", "wireless", "mobile", "internet",
            "utility", "water", "communications",
        ],
        keywords: &[
            "billing period", "account number", "kwh", "usage", "statement", "due date",
            "service address", "meter", "minutes", "monthly plan",
        ],
    },
    CategoryRules {
        category: ExpenseCategory::Housing,
        merchant_cues: &[
            "property", "properties", "realty", "residential", "apartments", "rentals",
            "management", "homes", "condo", "strata",
        ],
        keywords: &[
            "rent due", "monthly rent", "lease", "tenant", "landlord", "security deposit",
            "condo fee", "strata fee",
        ],
    },
    CategoryRules {
        category: ExpenseCategory::Entertainment,
        merchant_cues: &[
            "cinema", "theatre", "theater", "games", "music", "tickets", "arcade", "bowling",
            "stream",
        ],
        keywords: &[
            "movie", "ticket", "admission", "showtime", "concert", "popcorn", "subscription",
            "game", "seat",
        ],
    },
    CategoryRules {
        category: ExpenseCategory::Travel,
        merchant_cues: &[
            "airlines", "airways", "hotel", "motel", "resort", "suites", "hostel", "lodge",
            "car rental", "travel",
        ],
        keywords: &[
            "boarding", "flight", "gate", "check-in", "check in", "reservation", "nights",
            "room", "baggage", "itinerary", "folio",
        ],
    },
    CategoryRules {
        category: ExpenseCategory::Personal,
        merchant_cues: &[
            "pharmacy", "drug", "salon", "spa", "barber", "fitness", "gym", "beauty", "clinic",
            "dental", "optical", "cosmetics",
        ],
        keywords: &[
            "prescription", "rx", "pharmacy", "haircut", "shampoo", "vitamin", "cosmetic",
            "membership", "dental", "massage",
        ],
    },
    CategoryRules {
        category: ExpenseCategory::Income,
        merchant_cues: &["payroll", "deposit", "refund", "revenue", "transfer"],
        keywords: &[
            "payroll", "pay stub", "direct deposit", "salary", "net pay", "gross pay",
            "earnings", "reimbursement",
        ],
    },
    CategoryRules {
        category: ExpenseCategory::Other,
        merchant_cues: &[],
        keywords: &[],
    },
];

/// Airline, hotel, and car-rental brand tokens that strongly imply travel
/// when they appear in the merchant key
pub const TRAVEL_BRAND_TOKENS: &[&str] = &[
    "air canada",
    "westjet",
    "porter",
    "flair",
    "delta",
    "united",
    "american airlines",
    "marriott",
    "hilton",
    "hyatt",
    "fairmont",
    "sheraton",
    "holiday inn",
    "best western",
    "airbnb",
    "expedia",
    "booking com",
    "hertz",
    "avis",
    "enterprise rent",
    "via rail",
    "amtrak",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_follow_category_order() {
        let order: Vec<_> = CATEGORY_RULES.iter().map(|r| r.category).collect();
        assert_eq!(order, ExpenseCategory::all());
    }

    #[test]
    fn test_no_seeds_for_other() {
        assert!(MERCHANT_SEEDS
            .iter()
            .all(|g| g.category != ExpenseCategory::Other));
    }

    #[test]
    fn test_cues_and_keywords_are_lowercase() {
        for rules in CATEGORY_RULES {
            for token in rules.merchant_cues.iter().chain(rules.keywords) {
                assert_eq!(*token, token.to_lowercase());
            }
        }
    }
}
