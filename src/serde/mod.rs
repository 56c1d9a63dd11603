use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};

/// JMH writes non-finite numbers as strings, e.g. `"NaN"` or `"-Infinity"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRep {
    Number(f64),
    Text(String),
}

impl NumberRep {
    fn into_f64<E: de::Error>(self) -> Result<f64, E> {
        match self {
            Self::Number(value) => Ok(value),
            Self::Text(rep) => f64::from_str(rep.trim())
                .map_err(|err| de::Error::custom(format!("expected a number but got {:?}: {}", rep, err))),
        }
    }
}

pub fn deserialize_lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    NumberRep::deserialize(deserializer)?.into_f64()
}

pub fn deserialize_lenient_f64_pair<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[f64; 2], D::Error> {
    let [first, second]: [NumberRep; 2] = Deserialize::deserialize(deserializer)?;
    Ok([first.into_f64()?, second.into_f64()?])
}

/// Treats an explicit `null` the same as a missing field.
pub fn deserialize_null_default<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: Deserializer<'de>,
{
    let value: Option<T> = Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
