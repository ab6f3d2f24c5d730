use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The nine domains a review or image can hang off. Declaration order is the
/// priority order used whenever several ids are inspected in turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    Tour,
    Car,
    Hotel,
    Accessory,
    ThingToSee,
    ThingToDo,
    FoodAndDrink,
    Mice,
    Surrounding,
}

impl TargetKind {
    pub const ALL: [TargetKind; 9] = [
        TargetKind::Tour,
        TargetKind::Car,
        TargetKind::Hotel,
        TargetKind::Accessory,
        TargetKind::ThingToSee,
        TargetKind::ThingToDo,
        TargetKind::FoodAndDrink,
        TargetKind::Mice,
        TargetKind::Surrounding,
    ];

    /// URL slug, also the serde name.
    pub fn slug(self) -> &'static str {
        match self {
            TargetKind::Tour => "tour",
            TargetKind::Car => "car",
            TargetKind::Hotel => "hotel",
            TargetKind::Accessory => "accessory",
            TargetKind::ThingToSee => "thing-to-see",
            TargetKind::ThingToDo => "thing-to-do",
            TargetKind::FoodAndDrink => "food-and-drink",
            TargetKind::Mice => "mice",
            TargetKind::Surrounding => "surrounding",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            TargetKind::Tour => "tours",
            TargetKind::Car => "cars",
            TargetKind::Hotel => "hotels",
            TargetKind::Accessory => "tour_accessories",
            TargetKind::ThingToSee => "things_to_see",
            TargetKind::ThingToDo => "things_to_do",
            TargetKind::FoodAndDrink => "food_and_drinks",
            TargetKind::Mice => "mice",
            TargetKind::Surrounding => "surroundings",
        }
    }

    /// Foreign key column in `reviews` and `images`.
    pub fn fk_column(self) -> &'static str {
        match self {
            TargetKind::Tour => "tour_id",
            TargetKind::Car => "car_id",
            TargetKind::Hotel => "hotel_id",
            TargetKind::Accessory => "accessory_id",
            TargetKind::ThingToSee => "thing_to_see_id",
            TargetKind::ThingToDo => "thing_to_do_id",
            TargetKind::FoodAndDrink => "food_and_drink_id",
            TargetKind::Mice => "mice_id",
            TargetKind::Surrounding => "surrounding_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TargetKind::Tour => "Tour",
            TargetKind::Car => "Car",
            TargetKind::Hotel => "Hotel",
            TargetKind::Accessory => "Accessory",
            TargetKind::ThingToSee => "Thing to see",
            TargetKind::ThingToDo => "Thing to do",
            TargetKind::FoodAndDrink => "Food and drink",
            TargetKind::Mice => "Mice",
            TargetKind::Surrounding => "Surrounding",
        }
    }

    pub fn not_found(self) -> tourbook::Error {
        tourbook::Error::not_found(format!("{} not found", self.label()))
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for TargetKind {
    type Err = tourbook::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| {
                tourbook::Error::validation(format!("unknown target kind '{s}'"))
            })
    }
}

/// One row in one of the target tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRef {
    pub kind: TargetKind,
    pub id: i64,
}

impl TargetRef {
    pub fn new(kind: TargetKind, id: i64) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

/// The nine nullable foreign keys as they appear both in request bodies
/// (`tourId`, `carId`, ...) and in table rows (`tour_id`, `car_id`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TargetIds {
    pub tour_id: Option<i64>,
    pub car_id: Option<i64>,
    pub hotel_id: Option<i64>,
    pub accessory_id: Option<i64>,
    pub thing_to_see_id: Option<i64>,
    pub thing_to_do_id: Option<i64>,
    pub food_and_drink_id: Option<i64>,
    pub mice_id: Option<i64>,
    pub surrounding_id: Option<i64>,
}

impl TargetIds {
    pub fn only(target: TargetRef) -> Self {
        let mut ids = Self::default();
        *ids.slot_mut(target.kind) = Some(target.id);
        ids
    }

    pub fn get(&self, kind: TargetKind) -> Option<i64> {
        match kind {
            TargetKind::Tour => self.tour_id,
            TargetKind::Car => self.car_id,
            TargetKind::Hotel => self.hotel_id,
            TargetKind::Accessory => self.accessory_id,
            TargetKind::ThingToSee => self.thing_to_see_id,
            TargetKind::ThingToDo => self.thing_to_do_id,
            TargetKind::FoodAndDrink => self.food_and_drink_id,
            TargetKind::Mice => self.mice_id,
            TargetKind::Surrounding => self.surrounding_id,
        }
    }

    fn slot_mut(&mut self, kind: TargetKind) -> &mut Option<i64> {
        match kind {
            TargetKind::Tour => &mut self.tour_id,
            TargetKind::Car => &mut self.car_id,
            TargetKind::Hotel => &mut self.hotel_id,
            TargetKind::Accessory => &mut self.accessory_id,
            TargetKind::ThingToSee => &mut self.thing_to_see_id,
            TargetKind::ThingToDo => &mut self.thing_to_do_id,
            TargetKind::FoodAndDrink => &mut self.food_and_drink_id,
            TargetKind::Mice => &mut self.mice_id,
            TargetKind::Surrounding => &mut self.surrounding_id,
        }
    }

    /// Every populated id, in priority order.
    pub fn populated(&self) -> Vec<TargetRef> {
        TargetKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|id| TargetRef::new(kind, id)))
            .collect()
    }

    /// The single referenced target. Zero or several populated ids is a
    /// validation error; nothing is picked by precedence.
    pub fn single(&self) -> tourbook::Result<TargetRef> {
        match self.populated().as_slice() {
            [target] => Ok(*target),
            [] => Err(tourbook::Error::validation(
                "exactly one target id is required, none given",
            )),
            many => {
                let kinds = many
                    .iter()
                    .map(|t| t.kind.slug())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(tourbook::Error::validation(format!(
                    "exactly one target id is required, got: {kinds}"
                )))
            }
        }
    }
}

impl From<TargetRef> for TargetIds {
    fn from(target: TargetRef) -> Self {
        Self::only(target)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TargetRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the review and image logic needs to know about a target row; the
/// sibling domains own the rest of its columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub kind: TargetKind,
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Target {
    pub fn from_row(kind: TargetKind, row: TargetRow) -> Self {
        Self {
            kind,
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    pub fn target_ref(&self) -> TargetRef {
        TargetRef::new(self.kind, self.id)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ImageRow {
    pub id: i64,
    pub url: String,
    #[sqlx(flatten)]
    pub targets: TargetIds,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: i64,
    pub url: String,
    pub target: TargetRef,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ImageRow> for Image {
    type Error = tourbook::Error;

    fn try_from(row: ImageRow) -> Result<Self, Self::Error> {
        let target = row.targets.populated().first().copied().ok_or_else(|| {
            tourbook::Error::Internal(anyhow::anyhow!(
                "image {} has no target",
                row.id
            ))
        })?;
        Ok(Self {
            id: row.id,
            url: row.url,
            target,
            created_at: row.created_at,
        })
    }
}
