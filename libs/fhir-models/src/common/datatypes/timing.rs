//! Timing and Dosage

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{CodeableConcept, Duration, Element, Extension, Period, Range, Ratio, SimpleQuantity};
use crate::common::decimal::Decimal;
use crate::common::primitive::Primitive;

crate::choice_type! {
    /// Timing.repeat.bounds[x]
    pub enum TimingRepeatBounds("bounds") {
        Duration(Duration),
        Range(Range),
        Period(Period),
    }
}

/// Unit of time (UCUM)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitsOfTime {
    #[serde(rename = "s")]
    Second,
    #[serde(rename = "min")]
    Minute,
    #[serde(rename = "h")]
    Hour,
    #[serde(rename = "d")]
    Day,
    #[serde(rename = "wk")]
    Week,
    #[serde(rename = "mo")]
    Month,
    #[serde(rename = "a")]
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

/// When the event is to occur
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingRepeat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub bounds: Option<TimingRepeatBounds>,

    /// Number of times to repeat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,

    #[serde(rename = "_count", skip_serializing_if = "Option::is_none")]
    pub count_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_max: Option<u32>,

    #[serde(rename = "_countMax", skip_serializing_if = "Option::is_none")]
    pub count_max_ext: Option<Element>,

    /// How long when it happens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Decimal>,

    #[serde(rename = "_duration", skip_serializing_if = "Option::is_none")]
    pub duration_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_max: Option<Decimal>,

    #[serde(rename = "_durationMax", skip_serializing_if = "Option::is_none")]
    pub duration_max_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_unit: Option<UnitsOfTime>,

    #[serde(rename = "_durationUnit", skip_serializing_if = "Option::is_none")]
    pub duration_unit_ext: Option<Element>,

    /// Event occurs frequency times per period
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,

    #[serde(rename = "_frequency", skip_serializing_if = "Option::is_none")]
    pub frequency_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_max: Option<u32>,

    #[serde(rename = "_frequencyMax", skip_serializing_if = "Option::is_none")]
    pub frequency_max_ext: Option<Element>,

    /// Event occurs frequency times per period
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Decimal>,

    #[serde(rename = "_period", skip_serializing_if = "Option::is_none")]
    pub period_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_max: Option<Decimal>,

    #[serde(rename = "_periodMax", skip_serializing_if = "Option::is_none")]
    pub period_max_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_unit: Option<UnitsOfTime>,

    #[serde(rename = "_periodUnit", skip_serializing_if = "Option::is_none")]
    pub period_unit_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<Vec<DayOfWeek>>,

    #[serde(rename = "_dayOfWeek", skip_serializing_if = "Option::is_none")]
    pub day_of_week_ext: Option<Vec<Option<Element>>>,

    /// Time of day for action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<Vec<String>>,

    #[serde(rename = "_timeOfDay", skip_serializing_if = "Option::is_none")]
    pub time_of_day_ext: Option<Vec<Option<Element>>>,

    /// Code for time period of occurrence (event-timing)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<Vec<String>>,

    #[serde(rename = "_when", skip_serializing_if = "Option::is_none")]
    pub when_ext: Option<Vec<Option<Element>>>,

    /// Minutes from event (before or after)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,

    #[serde(rename = "_offset", skip_serializing_if = "Option::is_none")]
    pub offset_ext: Option<Element>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(TimingRepeat, "Timing.repeat", choices = [TimingRepeatBounds]);
crate::impl_element!(TimingRepeat);

crate::model_builder! {
    pub struct TimingRepeatBuilder => TimingRepeat {
        set set_bounds(bounds: TimingRepeatBounds);
        set set_count(count: u32);
        set set_count_max(count_max: u32);
        set set_duration(duration: Decimal);
        set set_duration_max(duration_max: Decimal);
        set set_duration_unit(duration_unit: UnitsOfTime);
        set set_frequency(frequency: u32);
        set set_frequency_max(frequency_max: u32);
        set set_period(period: Decimal);
        set set_period_max(period_max: Decimal);
        set set_period_unit(period_unit: UnitsOfTime);
        add add_day_of_week(day_of_week: DayOfWeek);
        add add_time_of_day(time_of_day: String);
        add add_when(when: String);
        set set_offset(offset: u32);
    }
}

/// A timing schedule that specifies an event that may occur multiple times
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// When the event occurs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<Vec<String>>,

    #[serde(rename = "_event", skip_serializing_if = "Option::is_none")]
    pub event_ext: Option<Vec<Option<Element>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<TimingRepeat>,

    /// BID | TID | QID | AM | PM | QD | QOD | +
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(Timing, "Timing");
crate::impl_backbone_element!(Timing);

crate::model_builder! {
    pub struct TimingBuilder => Timing {
        add add_event(event: String);
        set set_repeat(repeat: TimingRepeat);
        set set_code(code: CodeableConcept);
    }
}

crate::choice_type! {
    /// Dosage.asNeeded[x] (R4)
    pub enum DosageAsNeeded("asNeeded") {
        Boolean(Primitive<bool>),
        CodeableConcept(CodeableConcept),
    }
}

crate::choice_type! {
    /// Dosage.doseAndRate.dose[x]
    pub enum DosageDose("dose") {
        Range(Range),
        Quantity(SimpleQuantity),
    }
}

crate::choice_type! {
    /// Dosage.doseAndRate.rate[x]
    pub enum DosageRate("rate") {
        Ratio(Ratio),
        Range(Range),
        Quantity(SimpleQuantity),
    }
}

/// Amount of medication administered
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DosageDoseAndRate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    /// The kind of dose or rate specified
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<CodeableConcept>,

    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub dose: Option<DosageDose>,

    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub rate: Option<DosageRate>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(
    DosageDoseAndRate,
    "Dosage.doseAndRate",
    choices = [DosageDose, DosageRate]
);
crate::impl_element!(DosageDoseAndRate);

crate::model_builder! {
    pub struct DosageDoseAndRateBuilder => DosageDoseAndRate {
        set set_type(type_: CodeableConcept);
        set set_dose(dose: DosageDose);
        set set_rate(rate: DosageRate);
    }
}

/// How the medication is/was taken or should be taken.
///
/// `maxDosePerPeriod` (a Ratio in R4, repeating in R5) and the R5 `asNeeded` /
/// `asNeededFor` pair are carried in `additional`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dosage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// The order of the dosage instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i32>,

    #[serde(rename = "_sequence", skip_serializing_if = "Option::is_none")]
    pub sequence_ext: Option<Element>,

    /// Free text dosage instructions e.g. SIG
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(rename = "_text", skip_serializing_if = "Option::is_none")]
    pub text_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_instruction: Option<Vec<CodeableConcept>>,

    /// Patient or consumer oriented instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_instruction: Option<String>,

    #[serde(rename = "_patientInstruction", skip_serializing_if = "Option::is_none")]
    pub patient_instruction_ext: Option<Element>,

    /// When medication should be administered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<Timing>,

    /// Take "as needed" (for x)
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub as_needed: Option<DosageAsNeeded>,

    /// Body site to administer to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<CodeableConcept>,

    /// How drug should enter body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<CodeableConcept>,

    /// Technique for administering medication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose_and_rate: Option<Vec<DosageDoseAndRate>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_dose_per_administration: Option<SimpleQuantity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_dose_per_lifetime: Option<SimpleQuantity>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(Dosage, "Dosage", choices = [DosageAsNeeded]);
crate::impl_backbone_element!(Dosage);

crate::model_builder! {
    pub struct DosageBuilder => Dosage {
        set set_sequence(sequence: i32);
        set set_text(text: String);
        add add_additional_instruction(additional_instruction: CodeableConcept);
        set set_patient_instruction(patient_instruction: String);
        set set_timing(timing: Timing);
        set set_as_needed(as_needed: DosageAsNeeded);
        set set_site(site: CodeableConcept);
        set set_route(route: CodeableConcept);
        set set_method(method: CodeableConcept);
        add add_dose_and_rate(dose_and_rate: DosageDoseAndRate);
        set set_max_dose_per_administration(max_dose_per_administration: SimpleQuantity);
        set set_max_dose_per_lifetime(max_dose_per_lifetime: SimpleQuantity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::builder::ModelBuilder;
    use crate::common::datatypes::Quantity;
    use crate::common::model::FhirModel;
    use serde_json::json;

    #[test]
    fn test_dosage_roundtrip() {
        let json = json!({
            "sequence": 1,
            "text": "1 tablet every 8 hours as needed for pain",
            "timing": {
                "repeat": {
                    "boundsPeriod": {"start": "2015-01-15"},
                    "frequency": 1,
                    "period": 8.5,
                    "periodUnit": "h",
                    "dayOfWeek": ["mon", "wed"]
                }
            },
            "asNeededCodeableConcept": {"text": "pain"},
            "doseAndRate": [
                {"doseQuantity": {"value": 1.5, "unit": "TAB"}}
            ]
        });

        let dosage = Dosage::from_json(&json).unwrap();
        let repeat = dosage.timing.as_ref().and_then(|t| t.repeat.as_ref()).unwrap();
        assert!(matches!(repeat.bounds, Some(TimingRepeatBounds::Period(_))));
        assert_eq!(repeat.period_unit, Some(UnitsOfTime::Hour));
        assert!(matches!(dosage.as_needed, Some(DosageAsNeeded::CodeableConcept(_))));
        assert_eq!(dosage.to_json().unwrap(), json);
    }

    #[test]
    fn test_r5_as_needed_kept_in_additional() {
        let json = json!({
            "asNeeded": true,
            "asNeededFor": [{"text": "pain"}]
        });
        let dosage = Dosage::from_json(&json).unwrap();
        assert!(dosage.as_needed.is_none());
        assert!(dosage.additional.contains_key("asNeeded"));
        assert_eq!(dosage.to_json().unwrap(), json);
    }

    #[test]
    fn test_dose_and_rate_builder() {
        let dose_and_rate = DosageDoseAndRateBuilder::default()
            .set_dose(DosageDose::Quantity(Quantity::ucum(Decimal::new(55, 1), "mg")))
            .set_rate(DosageRate::Range(Range::default()))
            .build();
        let json = dose_and_rate.to_json().unwrap();
        assert!(json.get("doseQuantity").is_some());
        assert!(json.get("rateRange").is_some());
    }
}
