use serde::{de, Deserialize, Deserializer};

const FIRST_PAGE: i64 = 1;

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    pub page: i64,
}

fn first_page() -> i64 {
    FIRST_PAGE
}

// anything that isn't an integer falls back to the first page instead of rejecting the request
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(parse_page).unwrap_or(FIRST_PAGE))
}

// integers outside i64 saturate, so they still land on an empty page
fn parse_page(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let digits = raw.strip_prefix(|c| c == '+' || c == '-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match raw.parse::<i64>() {
        Ok(page) => Some(page),
        Err(_) if raw.starts_with('-') => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategoryId {
    Number(i64),
    Text(String),
}

/// Category ids arrive as numbers or as strings from `<select>` values. Only the
/// number `0`, `""` and `null` mean "no category"; the string `"0"` is a real id.
pub fn deserialize_category_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawCategoryId>::deserialize(deserializer)? {
        None | Some(RawCategoryId::Number(0)) => Ok(None),
        Some(RawCategoryId::Number(id)) => Ok(Some(id)),
        Some(RawCategoryId::Text(text)) if text.is_empty() => Ok(None),
        Some(RawCategoryId::Text(text)) => {
            text.trim().parse().map(Some).map_err(de::Error::custom)
        }
    }
}
