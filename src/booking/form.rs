//! The form for creating and editing bookings.

use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    booking::{Booking, BookingWindow, NewBooking},
    datetime::format_time,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, FormAction,
        form_error_message,
    },
    ledger::parse_rupiah,
    room::{Room, RoomId},
    validation::ValidationError,
};

/// The fields of the booking form as submitted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookingForm {
    pub room_id: String,
    pub renter: String,
    #[serde(default)]
    pub phone: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub notes: String,
    /// Left blank for free use of a room, e.g. by the mosque itself.
    #[serde(default)]
    pub total_cost: String,
}

impl BookingForm {
    /// Parse and check the submitted fields.
    ///
    /// # Errors
    /// Returns a [ValidationError] if no room is selected, a date, time or
    /// amount cannot be parsed, the renter is blank or the booking does not
    /// end after it starts.
    pub fn parse(&self) -> Result<NewBooking, ValidationError> {
        let room_id: RoomId = self
            .room_id
            .trim()
            .parse()
            .map_err(|_| ValidationError::MissingField("room"))?;

        let window = BookingWindow::parse(
            &self.start_date,
            &self.start_time,
            &self.end_date,
            &self.end_time,
        )?;

        let total_cost = if self.total_cost.trim().is_empty() {
            0
        } else {
            parse_rupiah(&self.total_cost)?
        };

        let booking = NewBooking {
            room_id,
            renter: self.renter.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            window,
            purpose: self.purpose.trim().to_owned(),
            notes: self.notes.trim().to_owned(),
            total_cost,
        };
        booking.validate()?;

        Ok(booking)
    }

    fn selected_room(&self) -> Option<RoomId> {
        self.room_id.trim().parse().ok()
    }
}

impl From<&Booking> for BookingForm {
    fn from(booking: &Booking) -> Self {
        let start = booking.window.start();
        let end = booking.window.end();

        Self {
            room_id: booking.room_id.to_string(),
            renter: booking.renter.clone(),
            phone: booking.phone.clone(),
            start_date: start.date().to_string(),
            start_time: format_time(start.time()),
            end_date: end.date().to_string(),
            end_time: format_time(end.time()),
            purpose: booking.purpose.clone(),
            notes: booking.notes.clone(),
            total_cost: booking.total_cost.to_string(),
        }
    }
}

/// Render the booking form.
///
/// Only rooms that are available for rent are offered, plus the booking's
/// current room when editing.
pub(super) fn booking_form_view(
    action: FormAction<'_>,
    values: &BookingForm,
    rooms: &[Room],
    submit_label: &str,
    error_message: &str,
) -> Markup {
    let selected_room = values.selected_room();

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
                label for="room_id" class=(FORM_LABEL_STYLE) { "Room" }

                select
                    name="room_id"
                    id="room_id"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Select a room" }

                    @for room in rooms.iter().filter(|room| {
                        room.available_for_rent || Some(room.id) == selected_room
                    }) {
                        @if Some(room.id) == selected_room {
                            option value=(room.id) selected { (room.name) }
                        } @else {
                            option value=(room.id) { (room.name) }
                        }
                    }
                }
            }

            div
            {
                label for="renter" class=(FORM_LABEL_STYLE) { "Renter" }

                input
                    id="renter"
                    type="text"
                    name="renter"
                    placeholder="Name or organisation"
                    value=(values.renter)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="phone" class=(FORM_LABEL_STYLE) { "Phone" }

                input
                    id="phone"
                    type="tel"
                    name="phone"
                    placeholder="0812..."
                    value=(values.phone)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="grid grid-cols-2 gap-4"
            {
                div
                {
                    label for="start_date" class=(FORM_LABEL_STYLE) { "Start Date" }

                    input
                        id="start_date"
                        type="date"
                        name="start_date"
                        value=(values.start_date)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="start_time" class=(FORM_LABEL_STYLE) { "Start Time" }

                    input
                        id="start_time"
                        type="time"
                        name="start_time"
                        value=(values.start_time)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="end_date" class=(FORM_LABEL_STYLE) { "End Date" }

                    input
                        id="end_date"
                        type="date"
                        name="end_date"
                        value=(values.end_date)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="end_time" class=(FORM_LABEL_STYLE) { "End Time" }

                    input
                        id="end_time"
                        type="time"
                        name="end_time"
                        value=(values.end_time)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="purpose" class=(FORM_LABEL_STYLE) { "Purpose" }

                input
                    id="purpose"
                    type="text"
                    name="purpose"
                    placeholder="Seminar, wedding, study circle..."
                    value=(values.purpose)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="total_cost" class=(FORM_LABEL_STYLE) { "Total Cost (Rp)" }

                input
                    id="total_cost"
                    type="text"
                    inputmode="numeric"
                    name="total_cost"
                    placeholder="0"
                    value=(values.total_cost)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="notes" class=(FORM_LABEL_STYLE) { "Notes" }

                textarea
                    id="notes"
                    name="notes"
                    rows="2"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (values.notes)
                }
            }

            (form_error_message(error_message))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        html::FormAction,
        room::{Room, RoomId},
        validation::ValidationError,
    };

    use super::{BookingForm, booking_form_view};

    fn form() -> BookingForm {
        BookingForm {
            room_id: "1".to_owned(),
            renter: "Yayasan Pendidikan XYZ".to_owned(),
            phone: "081234567890".to_owned(),
            start_date: "2026-02-20".to_owned(),
            start_time: "09:00".to_owned(),
            end_date: "2026-02-22".to_owned(),
            end_time: "15:00".to_owned(),
            purpose: "Pelatihan guru".to_owned(),
            notes: String::new(),
            total_cost: "900.000".to_owned(),
        }
    }

    fn room(id: RoomId, name: &str, available_for_rent: bool) -> Room {
        Room {
            id,
            name: name.to_owned(),
            capacity: 40,
            rental_rate: 300_000,
            available_for_rent,
            rules: String::new(),
            facilities: String::new(),
        }
    }

    #[test]
    fn parses_form() {
        let booking = form().parse().expect("form should be valid");

        assert_eq!(booking.room_id, 1);
        assert_eq!(booking.window.start(), datetime!(2026-02-20 09:00));
        assert_eq!(booking.window.end(), datetime!(2026-02-22 15:00));
        assert_eq!(booking.total_cost, 900_000);
    }

    #[test]
    fn blank_cost_is_free() {
        let booking = BookingForm {
            total_cost: " ".to_owned(),
            ..form()
        }
        .parse()
        .expect("form should be valid");

        assert_eq!(booking.total_cost, 0);
    }

    #[test]
    fn requires_a_room() {
        let result = BookingForm {
            room_id: String::new(),
            ..form()
        }
        .parse();

        assert_eq!(result, Err(ValidationError::MissingField("room")));
    }

    #[test]
    fn rejects_bad_time() {
        let result = BookingForm {
            start_time: "9 pagi".to_owned(),
            ..form()
        }
        .parse();

        assert_eq!(result, Err(ValidationError::InvalidTime("9 pagi".to_owned())));
    }

    #[test]
    fn rejects_booking_that_ends_before_it_starts() {
        let result = BookingForm {
            end_date: "2026-02-19".to_owned(),
            ..form()
        }
        .parse();

        assert!(matches!(result, Err(ValidationError::EmptyTimeWindow { .. })));
    }

    #[test]
    fn room_select_hides_rooms_not_for_rent() {
        let rooms = [
            room(1, "Ruang Kelas 1", true),
            room(2, "Gudang", false),
        ];
        let values = BookingForm {
            room_id: String::new(),
            ..form()
        };

        let markup = booking_form_view(FormAction::Create("/api/bookings"), &values, &rooms, "Create", "");

        let html = Html::parse_fragment(&markup.into_string());
        let options: Vec<String> = html
            .select(&Selector::parse("select[name=room_id] option").unwrap())
            .map(|option| option.text().collect())
            .collect();
        assert_eq!(options, vec!["Select a room", "Ruang Kelas 1"]);
    }

    #[test]
    fn room_select_keeps_current_room() {
        let rooms = [room(2, "Gudang", false)];
        let values = BookingForm {
            room_id: "2".to_owned(),
            ..form()
        };

        let markup = booking_form_view(FormAction::Update("/api/bookings/1"), &values, &rooms, "Update", "");

        let html = Html::parse_fragment(&markup.into_string());
        let selected = html
            .select(&Selector::parse("option[selected]").unwrap())
            .next()
            .expect("want a selected room");
        assert_eq!(selected.value().attr("value"), Some("2"));
    }
}
