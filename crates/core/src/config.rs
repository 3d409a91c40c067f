use crate::map::{latitude::LATITUDE_BOUND, topology::Shape};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Configuration that defines a map. The topology fields are fixed for the
/// lifetime of the map built from them; changing topology means building a
/// new map.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_topology_fields"))]
pub struct MapConfig {
    /// RNG seed for all randomized processes during map generation. The map
    /// engine itself only stores this; generators seed their RNG from it.
    ///
    /// When deserializing a config, this field supports a few options:
    /// - If the value is an integer that fits into `u64`, use that value
    /// - If it's a string that can be parsed into a `u64`, use the parsed
    ///   value
    /// - If it's any other string, hash it and use the hash value
    /// - If it's anything else (out of range number, float, array, etc.),
    ///   error
    ///
    /// Regardless of how the seed value is input, it will always be
    /// serialized as a number.
    #[serde(deserialize_with = "serde_seed::deserialize")]
    pub seed: u64,

    /// The shape of the grid: rectangular or hexagonal, isometric or not.
    pub shape: Shape,

    /// Does the map wrap around in the (native) X direction?
    pub wrap_x: bool,

    /// Does the map wrap around in the (native) Y direction?
    pub wrap_y: bool,

    /// Native width of the map, in tiles.
    #[validate(range(min = 4, max = 512))]
    pub width: u16,

    /// Native height of the map, in tiles. Must be even for isometric
    /// shapes.
    #[validate(range(min = 4, max = 512))]
    pub height: u16,

    /// Latitude at the northernmost point of the map, in
    /// `[-LATITUDE_BOUND, LATITUDE_BOUND]`. Together with `south_latitude`
    /// this controls how much of a planet the map spans: `(1000, -1000)` is
    /// pole to pole, `(0, 0)` is an all-temperate band.
    pub north_latitude: i32,

    /// Latitude at the southernmost point of the map, in
    /// `[-LATITUDE_BOUND, LATITUDE_BOUND]`. Must not exceed
    /// `north_latitude`.
    pub south_latitude: i32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            // Danger! This means the default will vary between calls!
            seed: rand::random(),

            shape: Shape::Flat,
            wrap_x: true,
            wrap_y: false,
            width: 80,
            height: 50,
            north_latitude: LATITUDE_BOUND,
            south_latitude: -LATITUDE_BOUND,
        }
    }
}

/// Cross-field checks that the per-field `range` rules can't express.
fn validate_topology_fields(
    config: &MapConfig,
) -> Result<(), ValidationError> {
    if config.shape.is_iso() && config.height % 2 != 0 {
        return Err(ValidationError::new(
            "isometric maps require an even height",
        ));
    }
    if config.north_latitude < config.south_latitude {
        return Err(ValidationError::new(
            "north latitude must not be south of south latitude",
        ));
    }
    for latitude in [config.north_latitude, config.south_latitude] {
        if latitude.abs() > LATITUDE_BOUND {
            return Err(ValidationError::new("latitude out of bounds"));
        }
    }
    Ok(())
}

/// The seed field has some fancy deserialization behavior implemented here.
/// See the `seed` field definition for a description.
mod serde_seed {
    use fnv::FnvHasher;
    use serde::{de::Visitor, Deserializer};
    use std::{
        convert::TryInto,
        fmt,
        hash::{Hash, Hasher},
    };

    /// Macro to make it easier to implement visit logic for different types
    macro_rules! impl_visit {
        ($fname:ident, $type:ty) => {
            fn $fname<E>(self, value: $type) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.try_into().map_err(|_| {
                    E::custom(format!("u64 out of range: {}", value))
                })
            }
        };
    }

    struct SeedVisitor;

    impl<'de> Visitor<'de> for SeedVisitor {
        type Value = u64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or string")
        }

        impl_visit!(visit_u8, u8);
        impl_visit!(visit_u16, u16);
        impl_visit!(visit_u32, u32);
        impl_visit!(visit_u64, u64);
        impl_visit!(visit_u128, u128);
        impl_visit!(visit_i8, i8);
        impl_visit!(visit_i16, i16);
        impl_visit!(visit_i32, i32);
        impl_visit!(visit_i64, i64);
        impl_visit!(visit_i128, i128);

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            match value.parse::<u64>() {
                Ok(seed) => Ok(seed),
                Err(_) => {
                    let mut hasher = FnvHasher::default();
                    value.hash(&mut hasher);
                    Ok(hasher.finish())
                }
            }
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        // We can deserialize from a bunch of different types so we can't
        // give a type hint here
        deserializer.deserialize_any(SeedVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MapConfig {
            seed: 0,
            ..MapConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_size_bounds() {
        let config = MapConfig {
            width: 2,
            ..MapConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MapConfig {
            height: 1000,
            ..MapConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_iso_parity() {
        let config = MapConfig {
            shape: Shape::IsoHex,
            width: 30,
            height: 31,
            ..MapConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MapConfig {
            height: 32,
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_latitude_bounds() {
        let config = MapConfig {
            north_latitude: 1500,
            ..MapConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MapConfig {
            south_latitude: -1500,
            ..MapConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_latitude_ordering() {
        let config = MapConfig {
            north_latitude: -500,
            south_latitude: 500,
            ..MapConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
