use std::collections::HashSet;

use time::{macros::format_description, Date, Time};

use super::estimate::parse_weight;

pub const INVALID_FORM_MESSAGE: &str = "Please fill in all required fields correctly.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickupField {
    Category,
    Weight,
    PickupDate,
    PickupTime,
    Address,
    SpecialInstructions,
}

impl PickupField {
    pub const ALL: [PickupField; 6] = [
        PickupField::Category,
        PickupField::Weight,
        PickupField::PickupDate,
        PickupField::PickupTime,
        PickupField::Address,
        PickupField::SpecialInstructions,
    ];

    /// Form field name expected by the server.
    pub fn form_name(&self) -> &'static str {
        match self {
            PickupField::Category => "waste_category",
            PickupField::Weight => "estimated_weight_kg",
            PickupField::PickupDate => "pickup_date",
            PickupField::PickupTime => "pickup_time",
            PickupField::Address => "address",
            PickupField::SpecialInstructions => "special_instructions",
        }
    }
}

/// Raw pickup form input, exactly as typed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PickupForm {
    pub category_id: String,
    pub weight: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub address: String,
    pub special_instructions: String,
}

impl PickupForm {
    pub fn value(&self, field: PickupField) -> &str {
        match field {
            PickupField::Category => &self.category_id,
            PickupField::Weight => &self.weight,
            PickupField::PickupDate => &self.pickup_date,
            PickupField::PickupTime => &self.pickup_time,
            PickupField::Address => &self.address,
            PickupField::SpecialInstructions => &self.special_instructions,
        }
    }

    pub fn set(&mut self, field: PickupField, value: String) {
        match field {
            PickupField::Category => self.category_id = value,
            PickupField::Weight => self.weight = value,
            PickupField::PickupDate => self.pickup_date = value,
            PickupField::PickupTime => self.pickup_time = value,
            PickupField::Address => self.address = value,
            PickupField::SpecialInstructions => self.special_instructions = value,
        }
    }

    pub fn field_error(&self, field: PickupField) -> Option<&'static str> {
        let value = self.value(field).trim();
        match field {
            PickupField::Category if value.is_empty() => Some("Select a waste category."),
            PickupField::Weight if parse_weight(value).is_none() => {
                Some("Enter a weight greater than zero.")
            }
            PickupField::PickupDate if parse_date(value).is_none() => {
                Some("Enter a pickup date (YYYY-MM-DD).")
            }
            PickupField::PickupTime if parse_time(value).is_none() => {
                Some("Enter a pickup time (HH:MM).")
            }
            PickupField::Address if value.is_empty() => Some("Enter the pickup address."),
            _ => None,
        }
    }

    pub fn invalid_fields(&self) -> Vec<PickupField> {
        PickupField::ALL
            .into_iter()
            .filter(|field| self.field_error(*field).is_some())
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.invalid_fields().is_empty()
    }

    /// URL-encoded body pairs, CSRF token first when known.
    pub fn to_form_pairs(&self, csrf_token: Option<&str>) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(PickupField::ALL.len() + 1);
        if let Some(token) = csrf_token {
            pairs.push(("csrfmiddlewaretoken".to_string(), token.to_string()));
        }
        for field in PickupField::ALL {
            pairs.push((
                field.form_name().to_string(),
                self.value(field).trim().to_string(),
            ));
        }
        pairs
    }
}

fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
}

fn parse_time(raw: &str) -> Option<Time> {
    Time::parse(raw, format_description!("[hour]:[minute]"))
        .or_else(|_| Time::parse(raw, format_description!("[hour]:[minute]:[second]")))
        .ok()
}

/// Per-field validity marks, set once a field has been left (blur) or the
/// form has been submitted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldMarks {
    touched: HashSet<PickupField>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldMark {
    Untouched,
    Valid,
    Invalid,
}

impl FieldMarks {
    pub fn touch(&mut self, field: PickupField) {
        self.touched.insert(field);
    }

    pub fn touch_all(&mut self) {
        self.touched.extend(PickupField::ALL);
    }

    pub fn clear(&mut self) {
        self.touched.clear();
    }

    pub fn mark(&self, form: &PickupForm, field: PickupField) -> FieldMark {
        if !self.touched.contains(&field) {
            FieldMark::Untouched
        } else if form.field_error(field).is_some() {
            FieldMark::Invalid
        } else {
            FieldMark::Valid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> PickupForm {
        PickupForm {
            category_id: "1".into(),
            weight: "4.5".into(),
            pickup_date: "2026-10-20".into(),
            pickup_time: "09:30".into(),
            address: "12 Ring Road, Kathmandu".into(),
            special_instructions: String::new(),
        }
    }

    #[test]
    fn complete_form_is_valid() {
        assert!(filled().is_valid());
    }

    #[test]
    fn each_required_field_is_checked() {
        let mut form = filled();
        form.category_id.clear();
        form.weight = "0".into();
        form.pickup_date = "20/10/2026".into();
        form.pickup_time = "late".into();
        form.address = "   ".into();

        assert_eq!(
            form.invalid_fields(),
            vec![
                PickupField::Category,
                PickupField::Weight,
                PickupField::PickupDate,
                PickupField::PickupTime,
                PickupField::Address,
            ]
        );
    }

    #[test]
    fn time_accepts_seconds() {
        let mut form = filled();
        form.pickup_time = "14:05:00".into();
        assert!(form.is_valid());
    }

    #[test]
    fn marks_only_after_touch() {
        let mut form = filled();
        form.address.clear();
        let mut marks = FieldMarks::default();
        assert_eq!(marks.mark(&form, PickupField::Address), FieldMark::Untouched);

        marks.touch(PickupField::Address);
        assert_eq!(marks.mark(&form, PickupField::Address), FieldMark::Invalid);

        marks.touch_all();
        assert_eq!(marks.mark(&form, PickupField::Weight), FieldMark::Valid);
    }

    #[test]
    fn form_pairs_use_server_field_names() {
        let pairs = filled().to_form_pairs(Some("tok"));
        assert_eq!(pairs[0], ("csrfmiddlewaretoken".to_string(), "tok".to_string()));
        assert!(pairs.contains(&("estimated_weight_kg".to_string(), "4.5".to_string())));
        assert_eq!(pairs.len(), 7);
    }
}
