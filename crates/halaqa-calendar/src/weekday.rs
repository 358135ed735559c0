//! Day-name mapping between admin-entered names and weekdays.
//!
//! Schedules are stored with day names as typed by academy staff, in either
//! English or Arabic. Weekday numbers follow the Sunday-first convention
//! (0 = Sunday .. 6 = Saturday).

use std::collections::HashMap;
use std::fmt;

use chrono::Weekday;
use halaqa_core::error::{CoreError, CoreResult};

/// Western day names, in Sunday-first order.
const WESTERN_DAY_NAMES: [(&str, Weekday); 7] = [
    ("sunday", Weekday::Sun),
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
];

/// Arabic day names, in Sunday-first order. These double as display labels.
const ARABIC_DAY_NAMES: [(&str, Weekday); 7] = [
    ("الأحد", Weekday::Sun),
    ("الاثنين", Weekday::Mon),
    ("الثلاثاء", Weekday::Tue),
    ("الأربعاء", Weekday::Wed),
    ("الخميس", Weekday::Thu),
    ("الجمعة", Weekday::Fri),
    ("السبت", Weekday::Sat),
];

/// Common alternate spellings (hamza variants) accepted on input only.
const ARABIC_DAY_VARIANTS: [(&str, Weekday); 4] = [
    ("الاحد", Weekday::Sun),
    ("الإثنين", Weekday::Mon),
    ("الاربعاء", Weekday::Wed),
    ("الجمعه", Weekday::Fri),
];

/// Display language for weekday labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayLocale {
    Western,
    Arabic,
}

/// ## Summary
/// Returns the Sunday-first weekday number (0 = Sunday .. 6 = Saturday).
#[must_use]
pub fn weekday_number(day: Weekday) -> u32 {
    day.num_days_from_sunday()
}

/// ## Summary
/// Returns the weekday for a Sunday-first weekday number.
#[must_use]
pub fn weekday_from_number(number: u32) -> Option<Weekday> {
    WESTERN_DAY_NAMES
        .iter()
        .map(|(_, day)| *day)
        .find(|day| weekday_number(*day) == number)
}

/// ## Summary
/// Returns the label for `day` in `locale`.
#[must_use]
pub fn day_label(day: Weekday, locale: DayLocale) -> &'static str {
    let table = match locale {
        DayLocale::Western => &WESTERN_DAY_NAMES,
        DayLocale::Arabic => &ARABIC_DAY_NAMES,
    };
    table[day.num_days_from_sunday() as usize].0
}

/// Set of weekdays, one bit per day.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Adds `day`; returns `false` when it was already present.
    pub fn insert(&mut self, day: Weekday) -> bool {
        let bit = Self::bit(day);
        let added = self.0 & bit == 0;
        self.0 |= bit;
        added
    }

    #[must_use]
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn len(&self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates the days in Sunday-first order.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WESTERN_DAY_NAMES
            .iter()
            .map(|(_, day)| *day)
            .filter(|day| self.contains(*day))
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_sunday()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Debug for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Outcome of mapping a list of day names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayResolution {
    pub weekdays: WeekdaySet,
    /// Names that matched no entry, in input order, as entered.
    pub unresolved: Vec<String>,
}

/// Immutable name → weekday table.
///
/// Lookups trim surrounding whitespace and compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayNameTable {
    by_name: HashMap<String, Weekday>,
}

impl DayNameTable {
    /// Table with no names at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    /// ## Summary
    /// Returns a copy of the table with `name` mapped to `day`.
    ///
    /// An existing mapping for the same name is replaced.
    #[must_use]
    pub fn with_alias(mut self, name: &str, day: Weekday) -> Self {
        self.by_name.insert(normalize(name), day);
        self
    }

    /// ## Summary
    /// Builds the default table extended with configured aliases, each
    /// mapped to an English weekday name (`"lundi" = "monday"`).
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` if an alias is blank or its target is
    /// not an English weekday name.
    pub fn from_aliases(aliases: &HashMap<String, String>) -> CoreResult<Self> {
        let mut table = Self::default();

        for (alias, target) in aliases {
            if alias.trim().is_empty() {
                return Err(CoreError::ConfigError("blank day alias".to_string()));
            }
            let day = parse_western(target).map_err(|err| {
                CoreError::ConfigError(format!("day alias {alias:?}: {err}"))
            })?;
            table = table.with_alias(alias, day);
        }

        Ok(table)
    }

    /// ## Summary
    /// Looks up a single day name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Weekday> {
        self.by_name.get(&normalize(name)).copied()
    }

    /// ## Summary
    /// Maps every name, collapsing duplicates and collecting the names that
    /// did not resolve.
    #[must_use]
    pub fn resolve<I, S>(&self, names: I) -> DayResolution
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolution = DayResolution::default();

        for name in names {
            let name = name.as_ref();
            match self.lookup(name) {
                Some(day) => {
                    resolution.weekdays.insert(day);
                }
                None => resolution.unresolved.push(name.to_string()),
            }
        }

        resolution
    }

    /// ## Summary
    /// Returns every name in the table mapped to `day`, sorted.
    #[must_use]
    pub fn names_for(&self, day: Weekday) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .by_name
            .iter()
            .filter(|(_, mapped)| **mapped == day)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl Default for DayNameTable {
    fn default() -> Self {
        let by_name = WESTERN_DAY_NAMES
            .iter()
            .chain(ARABIC_DAY_NAMES.iter())
            .chain(ARABIC_DAY_VARIANTS.iter())
            .map(|(name, day)| (normalize(name), *day))
            .collect();

        Self { by_name }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn parse_western(name: &str) -> CoreResult<Weekday> {
    let wanted = normalize(name);
    WESTERN_DAY_NAMES
        .iter()
        .find(|(candidate, _)| *candidate == wanted)
        .map(|(_, day)| *day)
        .ok_or_else(|| CoreError::InvalidInput(format!("not an English weekday: {name:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_western_names_are_case_insensitive() {
        let table = DayNameTable::default();

        assert_eq!(table.lookup("sunday"), Some(Weekday::Sun));
        assert_eq!(table.lookup("Sunday"), Some(Weekday::Sun));
        assert_eq!(table.lookup(" WEDNESDAY "), Some(Weekday::Wed));
        assert_eq!(table.lookup("sun"), None);
    }

    #[test]
    fn test_arabic_names_and_variants() {
        let table = DayNameTable::default();

        for (name, day) in ARABIC_DAY_NAMES.iter().chain(ARABIC_DAY_VARIANTS.iter()) {
            assert_eq!(table.lookup(name), Some(*day), "{name}");
        }
        assert_eq!(table.lookup("الأحد"), table.lookup("sunday"));
    }

    #[test]
    fn test_resolve_collapses_duplicates_and_reports_unknown() {
        let table = DayNameTable::default();
        let resolution = table.resolve(["monday", "Monday", "الاثنين", "funday", "thursday"]);

        assert_eq!(resolution.weekdays.len(), 2);
        assert!(resolution.weekdays.contains(Weekday::Mon));
        assert!(resolution.weekdays.contains(Weekday::Thu));
        assert_eq!(resolution.unresolved, vec!["funday".to_string()]);
    }

    #[test]
    fn test_resolve_empty_input() {
        let resolution = DayNameTable::default().resolve(Vec::<String>::new());

        assert!(resolution.weekdays.is_empty());
        assert!(resolution.unresolved.is_empty());
    }

    #[test]
    fn test_weekday_numbers_are_sunday_first() {
        assert_eq!(weekday_number(Weekday::Sun), 0);
        assert_eq!(weekday_number(Weekday::Mon), 1);
        assert_eq!(weekday_number(Weekday::Sat), 6);
        assert_eq!(weekday_from_number(3), Some(Weekday::Wed));
        assert_eq!(weekday_from_number(7), None);
    }

    #[test]
    fn test_labels_round_trip_through_table() {
        let table = DayNameTable::default();

        for number in 0..7 {
            let day = weekday_from_number(number).expect("valid number");
            for locale in [DayLocale::Western, DayLocale::Arabic] {
                assert_eq!(table.lookup(day_label(day, locale)), Some(day));
            }
        }
        assert_eq!(day_label(Weekday::Fri, DayLocale::Arabic), "الجمعة");
        assert_eq!(table.names_for(Weekday::Mon), vec!["monday", "الإثنين", "الاثنين"]);
    }

    #[test]
    fn test_weekday_set_iterates_sunday_first() {
        let set: WeekdaySet = [Weekday::Sat, Weekday::Wed, Weekday::Sun, Weekday::Wed]
            .into_iter()
            .collect();

        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Weekday::Sun, Weekday::Wed, Weekday::Sat]
        );
        assert_eq!(format!("{set:?}"), "{Sun, Wed, Sat}");
    }

    #[test]
    fn test_from_aliases() {
        let aliases = HashMap::from([
            ("Lundi".to_string(), "monday".to_string()),
            ("hari minggu".to_string(), "Sunday".to_string()),
        ]);
        let table = DayNameTable::from_aliases(&aliases).expect("valid aliases");

        assert_eq!(table.lookup("lundi"), Some(Weekday::Mon));
        assert_eq!(table.lookup("Hari Minggu"), Some(Weekday::Sun));
        // Defaults are kept
        assert_eq!(table.lookup("friday"), Some(Weekday::Fri));
    }

    #[test]
    fn test_from_aliases_rejects_unknown_target() {
        let aliases = HashMap::from([("lundi".to_string(), "الاثنين".to_string())]);
        let err = DayNameTable::from_aliases(&aliases).expect_err("target must be English");

        assert!(matches!(err, CoreError::ConfigError(_)));
    }
}
