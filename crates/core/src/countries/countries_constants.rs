/// Group id of the EU neighbourhood countries
pub const EU_NEIGHBOURS_GROUP_ID: &str = "eu-neighbours";

/// Member names used when the directory cannot resolve the EU neighbourhood group.
/// Names are matched against `Country::display_name`.
const EU_NEIGHBOUR_FALLBACK_NAMES: &[&str] = &[
    "Albania",
    "Armenia",
    "Azerbaijan",
    "Belarus",
    "Bosnia and Herzegovina",
    "Georgia",
    "Moldova",
    "Montenegro",
    "North Macedonia",
    "Serbia",
    "Turkey",
    "Ukraine",
    "Russia",
    "Norway",
    "Switzerland",
    "United Kingdom",
    "Algeria",
    "Egypt",
    "Libya",
    "Morocco",
    "Tunisia",
];

/// Returns the static member list for a group, if one is known.
pub fn fallback_group_members(group_id: &str) -> Option<&'static [&'static str]> {
    match group_id {
        EU_NEIGHBOURS_GROUP_ID => Some(EU_NEIGHBOUR_FALLBACK_NAMES),
        _ => None,
    }
}
