//! The form for creating and editing rooms.

use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, FormAction,
        form_error_message,
    },
    ledger::parse_rupiah,
    room::{NewRoom, Room},
    validation::ValidationError,
};

/// The fields of the room form as submitted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RoomForm {
    pub name: String,
    pub capacity: String,
    pub rental_rate: String,
    /// Checkboxes are only submitted when ticked.
    #[serde(default)]
    pub available_for_rent: Option<String>,
    #[serde(default)]
    pub rules: String,
    #[serde(default)]
    pub facilities: String,
}

impl RoomForm {
    /// Parse and check the submitted fields.
    ///
    /// # Errors
    /// Returns a [ValidationError] if a number cannot be parsed or a required
    /// field is blank.
    pub fn parse(&self) -> Result<NewRoom, ValidationError> {
        let capacity = self
            .capacity
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidCapacity(self.capacity.clone()))?;

        let room = NewRoom {
            name: self.name.trim().to_owned(),
            capacity,
            rental_rate: parse_rupiah(&self.rental_rate)?,
            available_for_rent: self.available_for_rent.is_some(),
            rules: self.rules.trim().to_owned(),
            facilities: self.facilities.trim().to_owned(),
        };
        room.validate()?;

        Ok(room)
    }
}

impl From<&Room> for RoomForm {
    fn from(room: &Room) -> Self {
        Self {
            name: room.name.clone(),
            capacity: room.capacity.to_string(),
            rental_rate: room.rental_rate.to_string(),
            available_for_rent: room.available_for_rent.then(|| "on".to_owned()),
            rules: room.rules.clone(),
            facilities: room.facilities.clone(),
        }
    }
}

pub(super) fn room_form_view(
    action: FormAction<'_>,
    values: &RoomForm,
    submit_label: &str,
    error_message: &str,
) -> Markup {
    html! {
        form
            hx-post=[action.post_url()]
            hx-put=[action.put_url()]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Room Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Aula Utama"
                    value=(values.name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="capacity" class=(FORM_LABEL_STYLE) { "Capacity (people)" }

                input
                    id="capacity"
                    type="number"
                    name="capacity"
                    min="0"
                    step="1"
                    value=(values.capacity)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="rental_rate" class=(FORM_LABEL_STYLE) { "Rental Rate per Day (Rp)" }

                input
                    id="rental_rate"
                    type="text"
                    inputmode="numeric"
                    name="rental_rate"
                    placeholder="2.500.000"
                    value=(values.rental_rate)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex items-center gap-2"
            {
                input
                    id="available_for_rent"
                    type="checkbox"
                    name="available_for_rent"
                    checked[values.available_for_rent.is_some()];

                label for="available_for_rent" class="text-sm font-medium" { "Available for rent" }
            }

            div
            {
                label for="facilities" class=(FORM_LABEL_STYLE) { "Facilities" }

                textarea
                    id="facilities"
                    name="facilities"
                    rows="2"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (values.facilities)
                }
            }

            div
            {
                label for="rules" class=(FORM_LABEL_STYLE) { "Rules" }

                textarea
                    id="rules"
                    name="rules"
                    rows="3"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (values.rules)
                }
            }

            (form_error_message(error_message))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::validation::ValidationError;

    use super::RoomForm;

    fn form() -> RoomForm {
        RoomForm {
            name: " Aula Utama ".to_owned(),
            capacity: "500".to_owned(),
            rental_rate: "Rp 2.500.000".to_owned(),
            available_for_rent: Some("on".to_owned()),
            rules: String::new(),
            facilities: "AC".to_owned(),
        }
    }

    #[test]
    fn parses_form() {
        let room = form().parse().expect("form should be valid");

        assert_eq!(room.name, "Aula Utama");
        assert_eq!(room.capacity, 500);
        assert_eq!(room.rental_rate, 2_500_000);
        assert!(room.available_for_rent);
    }

    #[test]
    fn unticked_checkbox_means_not_for_rent() {
        let room = RoomForm {
            available_for_rent: None,
            ..form()
        }
        .parse()
        .expect("form should be valid");

        assert!(!room.available_for_rent);
    }

    #[test]
    fn decodes_body_without_optional_fields() {
        let form_data = "name=Ruang+Rapat&capacity=30&rental_rate=500000";

        let form: RoomForm = serde_html_form::from_str(form_data).unwrap();

        assert_eq!(form.available_for_rent, None);
        assert_eq!(form.rules, "");
        let room = form.parse().expect("form should be valid");
        assert_eq!(room.name, "Ruang Rapat");
        assert!(!room.available_for_rent);
    }

    #[test]
    fn rejects_bad_capacity() {
        let result = RoomForm {
            capacity: "lots".to_owned(),
            ..form()
        }
        .parse();

        assert_eq!(
            result,
            Err(ValidationError::InvalidCapacity("lots".to_owned()))
        );
    }

    #[test]
    fn rejects_blank_name() {
        let result = RoomForm {
            name: "  ".to_owned(),
            ..form()
        }
        .parse();

        assert_eq!(result, Err(ValidationError::MissingField("name")));
    }
}
