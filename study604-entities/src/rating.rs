use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

/// The fixed categories a study spot is rated in.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord, EnumIter, EnumCount, EnumString, Display,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum RatingCategory {
    Atmosphere,
    Wifi,
    OutletAccess,
    FoodBeverage,
    TableSpace,
}

impl RatingCategory {
    // The number of different categories, i.e. the number of enum variants
    pub const fn total_count() -> u8 {
        Self::COUNT as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Atmosphere => "Atmosphere",
            Self::Wifi => "Wi-Fi",
            Self::OutletAccess => "Outlet Access",
            Self::FoodBeverage => "Food & Beverage",
            Self::TableSpace => "Table Space",
        }
    }
}

/// Number of stars given in a single category.
///
/// Zero means "unrated", a submitted review needs
/// a value between [`RatingValue::min()`] and [`RatingValue::max()`].
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct RatingValue(u8);

impl RatingValue {
    pub const fn new(val: u8) -> Self {
        Self(val)
    }

    pub const fn unrated() -> Self {
        Self(0)
    }

    pub const fn min() -> Self {
        Self(1)
    }

    pub const fn max() -> Self {
        Self(5)
    }

    pub fn is_rated(self) -> bool {
        self != Self::unrated()
    }

    pub fn is_valid(self) -> bool {
        self >= Self::min() && self <= Self::max()
    }
}

impl From<u8> for RatingValue {
    fn from(from: u8) -> Self {
        Self(from)
    }
}

impl From<RatingValue> for u8 {
    fn from(from: RatingValue) -> Self {
        from.0
    }
}

impl From<RatingValue> for f64 {
    fn from(from: RatingValue) -> Self {
        f64::from(from.0)
    }
}

/// A rating aggregated by the store, between 0.0 and 5.0.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct AvgRatingValue(f64);

impl AvgRatingValue {
    pub const fn min() -> Self {
        Self(0.0)
    }

    pub const fn max() -> Self {
        Self(5.0)
    }

    pub fn clamp(self) -> Self {
        Self(self.0.max(Self::min().0).min(Self::max().0))
    }

    pub fn is_valid(self) -> bool {
        self >= Self::min() && self <= Self::max()
    }
}

impl From<f64> for AvgRatingValue {
    fn from(from: f64) -> Self {
        Self(from)
    }
}

impl From<AvgRatingValue> for f64 {
    fn from(from: AvgRatingValue) -> Self {
        from.0
    }
}

/// The five category ratings of a single review.
#[rustfmt::skip]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReviewRatings {
    pub atmosphere    : RatingValue,
    pub wifi          : RatingValue,
    pub outlet_access : RatingValue,
    pub food_beverage : RatingValue,
    pub table_space   : RatingValue,
}

impl ReviewRatings {
    pub const fn get(&self, category: RatingCategory) -> RatingValue {
        use RatingCategory as C;
        match category {
            C::Atmosphere => self.atmosphere,
            C::Wifi => self.wifi,
            C::OutletAccess => self.outlet_access,
            C::FoodBeverage => self.food_beverage,
            C::TableSpace => self.table_space,
        }
    }

    pub fn set(&mut self, category: RatingCategory, value: RatingValue) {
        use RatingCategory as C;
        let field = match category {
            C::Atmosphere => &mut self.atmosphere,
            C::Wifi => &mut self.wifi,
            C::OutletAccess => &mut self.outlet_access,
            C::FoodBeverage => &mut self.food_beverage,
            C::TableSpace => &mut self.table_space,
        };
        *field = value;
    }

    /// All categories that are still unrated or out of range.
    pub fn invalid_categories(&self) -> Vec<RatingCategory> {
        RatingCategory::iter()
            .filter(|c| !self.get(*c).is_valid())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.invalid_categories().is_empty()
    }

    /// Mean over all five categories.
    pub fn average(&self) -> AvgRatingValue {
        let sum: f64 = RatingCategory::iter().map(|c| f64::from(self.get(c))).sum();
        AvgRatingValue::from(sum / f64::from(RatingCategory::total_count())).clamp()
    }
}

/// Per-category ratings aggregated for a spot.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CategoryRatings {
    pub atmosphere: AvgRatingValue,
    pub wifi: AvgRatingValue,
    pub outlet_access: AvgRatingValue,
    pub food_beverage: AvgRatingValue,
    pub table_space: AvgRatingValue,
}

impl CategoryRatings {
    pub const fn get(&self, category: RatingCategory) -> AvgRatingValue {
        use RatingCategory as C;
        match category {
            C::Atmosphere => self.atmosphere,
            C::Wifi => self.wifi,
            C::OutletAccess => self.outlet_access,
            C::FoodBeverage => self.food_beverage,
            C::TableSpace => self.table_space,
        }
    }

    pub fn is_valid(&self) -> bool {
        RatingCategory::iter().all(|c| self.get(c).is_valid())
    }
}
