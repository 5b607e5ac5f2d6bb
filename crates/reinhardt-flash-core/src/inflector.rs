//! Word inflection used to label validation-error messages
//!
//! Only the three transforms the flattener needs are provided:
//! [`capitalize`], [`humanize`] and [`singularize`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Words whose singular and plural forms are identical
const UNINFLECTED: &[&str] = &[
	"data",
	"deer",
	"equipment",
	"fish",
	"information",
	"media",
	"money",
	"news",
	"rice",
	"series",
	"sheep",
	"species",
];

/// Irregular plural → singular pairs, matched on the trailing word
const IRREGULAR: &[(&str, &str)] = &[
	("people", "person"),
	("children", "child"),
	("men", "man"),
	("women", "woman"),
	("feet", "foot"),
	("teeth", "tooth"),
	("geese", "goose"),
	("mice", "mouse"),
	("oxen", "ox"),
	("criteria", "criterion"),
];

/// Suffix rules, tried in order; the first match wins
static SINGULAR_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
	[
		(r"(?i)(s)tatuses$", "${1}tatus"),
		(r"(?i)(quiz)zes$", "${1}"),
		(r"(?i)(matr)ices$", "${1}ix"),
		(r"(?i)(vert|ind)ices$", "${1}ex"),
		(r"(?i)(alias)(es)?$", "${1}"),
		(r"(?i)(alumn|bacill|cact|foc|fung|nucle|radi|stimul|syllab|termin)i$", "${1}us"),
		(r"(?i)([ftw]ax)es$", "${1}"),
		(r"(?i)(cris|test)es$", "${1}is"),
		(r"(?i)(shoe)s$", "${1}"),
		(r"(?i)(o)es$", "${1}"),
		(r"(?i)ouses$", "ouse"),
		(r"(?i)([^a])uses$", "${1}us"),
		(r"(?i)(x|ch|ss|sh)es$", "${1}"),
		(r"(?i)(m)ovies$", "${1}ovie"),
		(r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
		(r"(?i)(tive|hive|drive)s$", "${1}"),
		(r"(?i)([lr])ves$", "${1}f"),
		(r"(?i)([^rfoa])ves$", "${1}fe"),
		(r"(?i)(analy|diagno|parenthe|progno|synop|the)ses$", "${1}sis"),
		(r"(?i)([ti])a$", "${1}um"),
		(r"(?i)eaus$", "eau"),
		(r"(?i)(us|ss)$", "${1}"),
		(r"(?i)s$", ""),
	]
	.into_iter()
	.filter_map(|(pattern, replacement)| {
		Regex::new(pattern).ok().map(|regex| (regex, replacement))
	})
	.collect()
});

/// Uppercase the first character, leaving the rest untouched
///
/// # Examples
///
/// ```
/// use reinhardt_flash_core::inflector::capitalize;
///
/// assert_eq!(capitalize("name"), "Name");
/// assert_eq!(capitalize("first_name"), "First_name");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		None => String::new(),
		Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
	}
}

/// Turn an underscored identifier into a human-readable label
///
/// # Examples
///
/// ```
/// use reinhardt_flash_core::inflector::humanize;
///
/// assert_eq!(humanize("first_name"), "First Name");
/// assert_eq!(humanize("addresses"), "Addresses");
/// ```
pub fn humanize(word: &str) -> String {
	word.split('_')
		.map(capitalize)
		.collect::<Vec<_>>()
		.join(" ")
}

/// Singular form of an English plural
///
/// # Examples
///
/// ```
/// use reinhardt_flash_core::inflector::singularize;
///
/// assert_eq!(singularize("errors"), "error");
/// assert_eq!(singularize("warnings"), "warning");
/// assert_eq!(singularize("categories"), "category");
/// assert_eq!(singularize("people"), "person");
/// assert_eq!(singularize("news"), "news");
/// ```
pub fn singularize(word: &str) -> String {
	let lower = word.to_lowercase();

	if UNINFLECTED.iter().any(|w| lower.ends_with(w)) {
		return word.to_string();
	}

	for (plural, singular) in IRREGULAR {
		if lower.ends_with(plural) {
			let Some(stem) = word
				.len()
				.checked_sub(plural.len())
				.and_then(|end| word.get(..end))
			else {
				continue;
			};
			let replaced = if stem.is_empty() && word.starts_with(char::is_uppercase) {
				capitalize(singular)
			} else {
				singular.to_string()
			};
			return format!("{}{}", stem, replaced);
		}
	}

	for (regex, replacement) in SINGULAR_RULES.iter() {
		if regex.is_match(word) {
			return regex.replace(word, *replacement).into_owned();
		}
	}

	word.to_string()
}
