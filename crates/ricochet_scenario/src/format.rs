//! On-disk JSON layout
//!
//! Points are `{"x": .., "y": ..}` objects; integer coordinates are accepted.

use crate::ScenarioError;
use ricochet_core::math::Vec2;
use ricochet_core::{BulletDefinition, WallDefinition};
use serde::{Deserialize, Serialize};

/// Lifetime given to bullets whose record leaves it out.
pub const DEFAULT_BULLET_LIFETIME: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: f32,
    pub y: f32,
}

impl From<PointRecord> for Vec2 {
    fn from(point: PointRecord) -> Self {
        Vec2::new(point.x, point.y)
    }
}

impl From<Vec2> for PointRecord {
    fn from(vector: Vec2) -> Self {
        Self {
            x: vector.x,
            y: vector.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallRecord {
    pub start: PointRecord,
    pub end: PointRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulletRecord {
    pub start: PointRecord,
    pub velocity: PointRecord,
    /// Spawn time; 0 when absent.
    #[serde(default)]
    pub time: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<f32>,
}

fn finite(
    point: PointRecord,
    entity: &'static str,
    index: usize,
    field: &'static str,
) -> Result<Vec2, ScenarioError> {
    let vector = Vec2::from(point);
    if vector.is_finite() {
        Ok(vector)
    } else {
        Err(ScenarioError::InvalidVector {
            entity,
            index,
            field,
        })
    }
}

fn non_negative(value: f32, index: usize, field: &'static str) -> Result<f32, ScenarioError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ScenarioError::InvalidTime {
            index,
            field,
            value,
        })
    }
}

impl WallRecord {
    pub fn to_definition(self, index: usize) -> Result<WallDefinition, ScenarioError> {
        let start = finite(self.start, "wall", index, "start")?;
        let end = finite(self.end, "wall", index, "end")?;
        Ok(WallDefinition::new(start, end))
    }
}

impl From<&WallDefinition> for WallRecord {
    fn from(wall: &WallDefinition) -> Self {
        Self {
            start: wall.start().into(),
            end: wall.end().into(),
        }
    }
}

impl BulletRecord {
    pub fn to_definition(self, index: usize) -> Result<BulletDefinition, ScenarioError> {
        let start = finite(self.start, "bullet", index, "start")?;
        let velocity = finite(self.velocity, "bullet", index, "velocity")?;
        let time = non_negative(self.time, index, "time")?;
        let lifetime = self.lifetime.unwrap_or(DEFAULT_BULLET_LIFETIME);
        let lifetime = non_negative(lifetime, index, "lifetime")?;
        Ok(BulletDefinition::new(start, velocity, time, lifetime))
    }
}

impl From<&BulletDefinition> for BulletRecord {
    fn from(bullet: &BulletDefinition) -> Self {
        Self {
            start: bullet.starting_position.into(),
            velocity: bullet.velocity.into(),
            time: bullet.start_time,
            lifetime: Some(bullet.lifetime),
        }
    }
}

/// Parse a walls document.
pub fn parse_walls(json: &str) -> Result<Vec<WallDefinition>, ScenarioError> {
    let records: Vec<WallRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.to_definition(index))
        .collect()
}

/// Parse a bullets document.
pub fn parse_bullets(json: &str) -> Result<Vec<BulletDefinition>, ScenarioError> {
    let records: Vec<BulletRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.to_definition(index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_walls_with_integer_coordinates() {
        let walls = parse_walls(
            r#"[{"start": {"x": 10, "y": 100}, "end": {"x": 100.5, "y": 100}}]"#,
        )
        .unwrap();

        assert_eq!(walls.len(), 1);
        assert_eq!(walls[0].start(), Vec2::new(10.0, 100.0));
        assert_eq!(walls[0].end(), Vec2::new(100.5, 100.0));
    }

    #[test]
    fn test_bullet_defaults() {
        let bullets = parse_bullets(
            r#"[{"start": {"x": 350, "y": 320}, "velocity": {"x": -40, "y": 7}}]"#,
        )
        .unwrap();

        let bullet = &bullets[0];
        assert_eq!(bullet.starting_position, Vec2::new(350.0, 320.0));
        assert_eq!(bullet.velocity, Vec2::new(-40.0, 7.0));
        assert_eq!(bullet.start_time, 0.0);
        assert_eq!(bullet.lifetime, DEFAULT_BULLET_LIFETIME);
    }

    #[test]
    fn test_bullet_explicit_time_and_lifetime() {
        let bullets = parse_bullets(
            r#"[{"start": {"x": 0, "y": 0}, "velocity": {"x": 1, "y": 0}, "time": 2.5, "lifetime": 0.5}]"#,
        )
        .unwrap();

        assert_eq!(bullets[0].start_time, 2.5);
        assert_eq!(bullets[0].lifetime, 0.5);
    }

    #[test]
    fn test_negative_lifetime_rejected() {
        let result = parse_bullets(
            r#"[
                {"start": {"x": 0, "y": 0}, "velocity": {"x": 1, "y": 0}},
                {"start": {"x": 0, "y": 0}, "velocity": {"x": 1, "y": 0}, "lifetime": -1}
            ]"#,
        );

        match result {
            Err(ScenarioError::InvalidTime { index, field, value }) => {
                assert_eq!(index, 1);
                assert_eq!(field, "lifetime");
                assert_eq!(value, -1.0);
            }
            other => panic!("expected InvalidTime, got {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_vector_rejected() {
        let record = WallRecord {
            start: PointRecord { x: 0.0, y: 0.0 },
            end: PointRecord {
                x: f32::INFINITY,
                y: 1.0,
            },
        };

        assert!(matches!(
            record.to_definition(3),
            Err(ScenarioError::InvalidVector {
                entity: "wall",
                index: 3,
                field: "end"
            })
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(parse_walls("{"), Err(ScenarioError::Parse(_))));
        assert!(matches!(
            parse_bullets(r#"[{"start": {"x": 0}}]"#),
            Err(ScenarioError::Parse(_))
        ));
    }

    #[test]
    fn test_records_written_back_parse_to_the_same_definitions() {
        let bullet = BulletDefinition::new(Vec2::new(1.0, 2.0), Vec2::new(3.0, -4.0), 0.25, 6.0);
        let json = serde_json::to_string(&vec![BulletRecord::from(&bullet)]).unwrap();
        assert_eq!(parse_bullets(&json).unwrap(), vec![bullet]);
    }
}
