//! The "create a dish" form.

use serde::{Deserialize, Serialize};

use crate::engine::FormEngine;
use crate::error::SchemaError;
use crate::schema::{Condition, FieldDef, Schema, SchemaBuilder};

/// Key of the variant field selecting the dish type.
pub const DISH_TYPE: &str = "dishType";

/// The kinds of dish the form can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DishType {
    Pizza,
    Soup,
    Sandwich,
}

impl DishType {
    /// All dish types, in display order.
    pub const ALL: [Self; 3] = [Self::Pizza, Self::Soup, Self::Sandwich];

    /// Returns the value stored in the form and sent to the remote endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pizza => "pizza",
            Self::Soup => "soup",
            Self::Sandwich => "sandwich",
        }
    }

    /// Returns the option label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pizza => "Pizza",
            Self::Soup => "Soup",
            Self::Sandwich => "Sandwich",
        }
    }

    /// Parses a stored form value.
    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    fn condition(self) -> Condition {
        Condition::equals(DISH_TYPE, self.as_str())
    }
}

impl std::fmt::Display for DishType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the dish schema.
///
/// Base fields: name, preparation time and type. Pizza adds slice count and
/// diameter, soup adds spiciness, sandwich adds slices of bread.
pub fn dish_schema() -> Result<Schema, SchemaError> {
    let options: Vec<(&str, &str)> = DishType::ALL
        .iter()
        .map(|t| (t.label(), t.as_str()))
        .collect();

    SchemaBuilder::new()
        .field(
            FieldDef::text("dishName")
                .placeholder("Enter a dish name")
                .payload_key("name"),
        )
        .field(
            FieldDef::time("preparationTime")
                .label("Preparation Time")
                .step(1.0)
                .payload_key("preparation_time"),
        )
        .field(
            FieldDef::choice(DISH_TYPE, &options)
                .label("Dish Type")
                .placeholder("Select a type")
                .payload_key("type"),
        )
        .field(
            FieldDef::integer("noOfSlices")
                .label("Number Of Pizza Slices")
                .min(1.0)
                .payload_key("no_of_slices")
                .visible_when(DishType::Pizza.condition()),
        )
        .field(
            FieldDef::decimal("diameter")
                .label("Diameter")
                .min(1.0)
                .step(0.1)
                .visible_when(DishType::Pizza.condition()),
        )
        .field(
            FieldDef::integer("spicinessScale")
                .label("Spiciness Scale")
                .min(1.0)
                .max(10.0)
                .payload_key("spiciness_scale")
                .visible_when(DishType::Soup.condition()),
        )
        .field(
            FieldDef::integer("slicesOfBread")
                .label("Slices of Bread")
                .min(0.0)
                .payload_key("slices_of_bread")
                .visible_when(DishType::Sandwich.condition()),
        )
        .build()
}

/// Creates an engine for a blank dish form.
pub fn dish_form() -> Result<FormEngine, SchemaError> {
    Ok(FormEngine::new(dish_schema()?))
}

/// Returns the dish type currently selected in `engine`.
pub fn selected_dish_type(engine: &FormEngine) -> Option<DishType> {
    engine.value(DISH_TYPE).and_then(DishType::from_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;
    use crate::state::FormState;

    #[test]
    fn test_dish_schema_fields() {
        let schema = dish_schema().unwrap();
        let keys: Vec<&str> = schema.fields().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "dishName",
                "preparationTime",
                "dishType",
                "noOfSlices",
                "diameter",
                "spicinessScale",
                "slicesOfBread",
            ]
        );
        assert!(schema.fields().iter().all(|f| f.required));
        assert_eq!(schema.field("dishType").unwrap().kind, FieldKind::Enum);
        assert_eq!(schema.field("diameter").unwrap().kind, FieldKind::Decimal);
        assert_eq!(schema.field("spicinessScale").unwrap().max, Some(10.0));
    }

    #[test]
    fn test_payload_keys() {
        let schema = dish_schema().unwrap();
        let remote: Vec<&str> = schema.fields().iter().map(|f| f.remote_key()).collect();
        assert_eq!(
            remote,
            vec![
                "name",
                "preparation_time",
                "type",
                "no_of_slices",
                "diameter",
                "spiciness_scale",
                "slices_of_bread",
            ]
        );
    }

    #[test]
    fn test_variant_visibility() {
        let schema = dish_schema().unwrap();
        let mut state = FormState::for_schema(&schema);

        assert_eq!(schema.visible_fields(&state).count(), 3);

        for (dish_type, extra) in [
            (DishType::Pizza, vec!["noOfSlices", "diameter"]),
            (DishType::Soup, vec!["spicinessScale"]),
            (DishType::Sandwich, vec!["slicesOfBread"]),
        ] {
            state.set(DISH_TYPE, dish_type.as_str());
            let visible: Vec<&str> = schema
                .visible_fields(&state)
                .skip(3)
                .map(|f| f.key.as_str())
                .collect();
            assert_eq!(visible, extra, "{dish_type}");
        }
    }

    #[test]
    fn test_selected_dish_type() {
        let mut engine = dish_form().unwrap();
        assert_eq!(selected_dish_type(&engine), None);

        engine.set_field(DISH_TYPE, "soup");
        assert_eq!(selected_dish_type(&engine), Some(DishType::Soup));

        engine.set_field(DISH_TYPE, "burger");
        assert_eq!(selected_dish_type(&engine), None);
    }
}
