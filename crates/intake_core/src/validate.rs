//! Boundary validation of onboarding form payloads.
//!
//! The form posts loosely-typed JSON. Everything is checked here, on the
//! raw `serde_json::Value`, so that every failure can name the exact
//! offending path (`client_id`, `signals[2]`, `personas[1].job_title`)
//! before anything touches the store.

use serde_json::{Map, Value};

use crate::error::IntakeError;
use crate::types::{
    CompanyProfile, Goals, MarketSignals, Messaging, PersonaFields, SalesProcess, SegmentFields,
    SubmissionDraft, SubmissionFields,
};

type Result<T> = std::result::Result<T, IntakeError>;

/// Validate a raw form payload into a [`SubmissionDraft`].
///
/// Unknown keys are ignored; the form sends more than is persisted.
pub fn parse_submission(body: &Value) -> Result<SubmissionDraft> {
    let obj = body
        .as_object()
        .ok_or_else(|| IntakeError::validation("body", "expected a JSON object"))?;
    let r = FieldReader::root(obj);

    let client_id = r.required_str("client_id")?;

    let company = CompanyProfile {
        company_name: r.required_str("company_name")?,
        website: r.opt_str("website")?,
        contact_name: r.opt_str("contact_name")?,
        contact_email: r.opt_str("contact_email")?,
        employee_count: r.opt_str("employee_count")?,
        funding_stage: r.opt_str("funding_stage")?,
        hq_location: r.opt_str("hq_location")?,
        core_product: r.required_str("core_product")?,
        target_customer: r.opt_str("target_customer")?,
        annual_revenue: r.opt_str("annual_revenue")?,
        acv: r.opt_str("acv")?,
        sales_cycle_length: r.opt_str("sales_cycle_length")?,
        self_serve_pct: r.opt_str_or_int("self_serve_pct")?,
    };

    let market = MarketSignals {
        signals: r.str_list("signals")?,
        signal_details: r.opt_object("signal_details")?,
        custom_signals: r.str_list("custom_signals")?,
        job_titles: r.str_list("job_titles")?,
    };

    let process = SalesProcess {
        outbound_tools: r.str_list("outbound_tools")?,
        outbound_tools_other: r.opt_str("outbound_tools_other")?,
        crm: r.opt_str("crm")?,
        lead_sources: r.str_list("lead_sources")?,
        other_channels: r.str_list("other_channels")?,
    };

    let messaging = Messaging {
        customer_voice: r.opt_str("customer_voice")?,
        roi_results: r.opt_str("roi_results")?,
        case_studies_description: r.opt_str("case_studies_description")?,
        case_studies: r.object_list("case_studies")?,
        tone_style: r.opt_str("tone_style")?,
        messaging_notes: r.opt_str("messaging_notes")?,
        key_differentiators: r.str_list("key_differentiators")?,
        competitors: r.str_list("competitors")?,
    };

    let goals = Goals {
        primary_gtm_objective: r.opt_str("primary_gtm_objective")?,
        primary_gtm_objective_other: r.opt_str("primary_gtm_objective_other")?,
        success_metrics: r.str_list("success_metrics")?,
        success_definition: r.opt_str("success_definition")?,
        timeline_urgency: r.opt_str("timeline_urgency")?,
        monthly_budget: r.opt_str("monthly_budget")?,
    };

    let segments = r.entries("segments", parse_segment)?;
    let personas = r.entries("personas", parse_persona)?;

    Ok(SubmissionDraft {
        client_id,
        fields: SubmissionFields {
            company,
            market,
            process,
            messaging,
            goals,
        },
        segments,
        personas,
    })
}

fn parse_segment(r: &FieldReader<'_>) -> Result<SegmentFields> {
    let revenue_percentage = r.opt_int_aliased("revenue_percentage", "revenue_pct")?;
    if let Some(pct) = revenue_percentage {
        if !(0..=100).contains(&pct) {
            return Err(r.error("revenue_percentage", "must be between 0 and 100"));
        }
    }
    Ok(SegmentFields {
        segment_name: r.required_str_aliased("segment_name", "name")?,
        revenue_percentage,
        unique_characteristics: r.opt_str("unique_characteristics")?,
        pain_points: r.opt_str("pain_points")?,
        buying_triggers: r.opt_str("buying_triggers")?,
    })
}

fn parse_persona(r: &FieldReader<'_>) -> Result<PersonaFields> {
    Ok(PersonaFields {
        job_title: r.required_str_aliased("job_title", "title")?,
        primary_segment: r.opt_str("primary_segment")?,
        seniority_level: r.opt_str("seniority_level")?,
        pain_before_buying: r.opt_str("pain_before_buying")?,
        aha_moment: r.opt_str("aha_moment")?,
        objections: r.opt_str("objections")?,
        decision_criteria: r.opt_str("decision_criteria")?,
    })
}

// ── FieldReader ───────────────────────────────────────────────

/// Typed accessors over one JSON object, tagging errors with `prefix`.
struct FieldReader<'a> {
    obj: &'a Map<String, Value>,
    prefix: String,
}

impl<'a> FieldReader<'a> {
    fn root(obj: &'a Map<String, Value>) -> Self {
        Self {
            obj,
            prefix: String::new(),
        }
    }

    fn path(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn error(&self, key: &str, message: &str) -> IntakeError {
        IntakeError::validation(self.path(key), message)
    }

    /// Absent and `null` are the same thing to the form.
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.obj.get(key).filter(|v| !v.is_null())
    }

    fn required_str(&self, key: &str) -> Result<String> {
        match self.opt_str(key)? {
            Some(s) => Ok(s),
            None => Err(self.error(key, "is required")),
        }
    }

    /// A blank canonical key falls through to the alias.
    fn required_str_aliased(&self, key: &str, alias: &str) -> Result<String> {
        match self.opt_str(key)? {
            Some(s) => Ok(s),
            None => self.opt_str(alias)?.ok_or_else(|| self.error(key, "is required")),
        }
    }

    /// Blank strings are treated as absent.
    fn opt_str(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
            Some(_) => Err(self.error(key, "expected a string")),
        }
    }

    fn opt_str_or_int(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(Some(n.to_string())),
            Some(Value::String(_)) | None => self.opt_str(key),
            Some(_) => Err(self.error(key, "expected an integer or a string")),
        }
    }

    fn opt_int(&self, key: &str) -> Result<Option<i32>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(Some)
                .ok_or_else(|| self.error(key, "expected an integer")),
            Some(_) => Err(self.error(key, "expected an integer")),
        }
    }

    fn opt_int_aliased(&self, key: &str, alias: &str) -> Result<Option<i32>> {
        match self.opt_int(key)? {
            Some(v) => Ok(Some(v)),
            None => self.opt_int(alias),
        }
    }

    fn opt_object(&self, key: &str) -> Result<Option<Value>> {
        match self.get(key) {
            None => Ok(None),
            Some(v @ Value::Object(_)) => Ok(Some(v.clone())),
            Some(_) => Err(self.error(key, "expected an object")),
        }
    }

    fn array(&self, key: &str) -> Result<&'a [Value]> {
        match self.get(key) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(self.error(key, "expected an array")),
        }
    }

    /// Array of strings; blank entries are dropped, order is kept.
    fn str_list(&self, key: &str) -> Result<Vec<String>> {
        let mut out = Vec::new();
        for (idx, item) in self.array(key)?.iter().enumerate() {
            match item {
                Value::String(s) if s.trim().is_empty() => {}
                Value::String(s) => out.push(s.trim().to_string()),
                _ => {
                    return Err(IntakeError::validation(
                        format!("{}[{idx}]", self.path(key)),
                        "expected a string",
                    ))
                }
            }
        }
        Ok(out)
    }

    fn object_list(&self, key: &str) -> Result<Vec<Value>> {
        self.array(key)?
            .iter()
            .enumerate()
            .map(|(idx, item)| match item {
                Value::Object(_) => Ok(item.clone()),
                _ => Err(IntakeError::validation(
                    format!("{}[{idx}]", self.path(key)),
                    "expected an object",
                )),
            })
            .collect()
    }

    /// Parse each entry of an array of objects with a reader scoped to
    /// `key[idx].`.
    fn entries<T>(&self, key: &str, parse: fn(&FieldReader<'_>) -> Result<T>) -> Result<Vec<T>> {
        let mut out = Vec::new();
        for (idx, item) in self.array(key)?.iter().enumerate() {
            let entry_path = format!("{}[{idx}]", self.path(key));
            let obj = item
                .as_object()
                .ok_or_else(|| IntakeError::validation(entry_path.clone(), "expected an object"))?;
            let reader = FieldReader {
                obj,
                prefix: format!("{entry_path}."),
            };
            out.push(parse(&reader)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn minimal() -> Value {
        json!({
            "client_id": "c1",
            "company_name": "Acme",
            "core_product": "Widget",
        })
    }

    fn field_of(err: IntakeError) -> String {
        match err {
            IntakeError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn minimal_payload_is_accepted() {
        let draft = parse_submission(&minimal()).unwrap();
        assert_eq!(draft.client_id, "c1");
        assert_eq!(draft.fields.company.company_name, "Acme");
        assert!(draft.segments.is_empty());
        assert!(draft.personas.is_empty());
        assert!(draft.fields.market.signals.is_empty());
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert_eq!(field_of(parse_submission(&json!([1, 2])).unwrap_err()), "body");
    }

    #[test]
    fn missing_client_id_names_the_field() {
        let mut body = minimal();
        body.as_object_mut().unwrap().remove("client_id");
        assert_eq!(field_of(parse_submission(&body).unwrap_err()), "client_id");
    }

    #[test]
    fn blank_and_null_required_fields_are_missing() {
        let mut body = minimal();
        body["company_name"] = json!("   ");
        assert_eq!(field_of(parse_submission(&body).unwrap_err()), "company_name");

        let mut body = minimal();
        body["core_product"] = Value::Null;
        assert_eq!(field_of(parse_submission(&body).unwrap_err()), "core_product");
    }

    #[test]
    fn wrong_primitive_type_is_rejected() {
        let mut body = minimal();
        body["client_id"] = json!(42);
        let err = parse_submission(&body).unwrap_err();
        assert_eq!(err.to_string(), "invalid `client_id`: expected a string");
    }

    #[test]
    fn list_errors_name_the_element() {
        let mut body = minimal();
        body["signals"] = json!(["hiring", "funding", 7]);
        assert_eq!(field_of(parse_submission(&body).unwrap_err()), "signals[2]");
    }

    #[test]
    fn list_keeps_order_and_drops_blanks() {
        let mut body = minimal();
        body["job_titles"] = json!(["CTO", "", " VP Eng "]);
        let draft = parse_submission(&body).unwrap();
        assert_eq!(draft.fields.market.job_titles, vec!["CTO", "VP Eng"]);
    }

    #[test]
    fn segment_and_persona_aliases_are_accepted() {
        let mut body = minimal();
        body["segments"] = json!([{"name": "SMB", "revenue_pct": 40}]);
        body["personas"] = json!([{"title": "CTO"}, {"job_title": "VP Eng", "seniority_level": "VP"}]);
        let draft = parse_submission(&body).unwrap();
        assert_eq!(draft.segments[0].segment_name, "SMB");
        assert_eq!(draft.segments[0].revenue_percentage, Some(40));
        assert_eq!(draft.personas.len(), 2);
        assert_eq!(draft.personas[1].seniority_level.as_deref(), Some("VP"));
    }

    #[test]
    fn malformed_entry_names_its_position() {
        let mut body = minimal();
        body["segments"] = json!([{"segment_name": "SMB"}, {"pain_points": "churn"}]);
        assert_eq!(
            field_of(parse_submission(&body).unwrap_err()),
            "segments[1].segment_name"
        );

        let mut body = minimal();
        body["personas"] = json!([{"title": "CTO"}, "VP Eng"]);
        assert_eq!(field_of(parse_submission(&body).unwrap_err()), "personas[1]");
    }

    #[test]
    fn revenue_percentage_is_range_checked() {
        let mut body = minimal();
        body["segments"] = json!([{"segment_name": "SMB", "revenue_percentage": 140}]);
        assert_eq!(
            field_of(parse_submission(&body).unwrap_err()),
            "segments[0].revenue_percentage"
        );
    }

    #[test]
    fn self_serve_pct_accepts_int_or_string() {
        let mut body = minimal();
        body["self_serve_pct"] = json!(25);
        let draft = parse_submission(&body).unwrap();
        assert_eq!(draft.fields.company.self_serve_pct.as_deref(), Some("25"));

        body["self_serve_pct"] = json!("10-20%");
        let draft = parse_submission(&body).unwrap();
        assert_eq!(draft.fields.company.self_serve_pct.as_deref(), Some("10-20%"));

        body["self_serve_pct"] = json!(true);
        assert_eq!(field_of(parse_submission(&body).unwrap_err()), "self_serve_pct");
    }

    #[test]
    fn json_sections_are_type_checked() {
        let mut body = minimal();
        body["signal_details"] = json!({"hiring": "3 SDR roles open"});
        body["case_studies"] = json!([{"title": "Globex", "result": "3x pipeline"}]);
        let draft = parse_submission(&body).unwrap();
        assert!(draft.fields.market.signal_details.is_some());
        assert_eq!(draft.fields.messaging.case_studies.len(), 1);

        body["case_studies"] = json!(["Globex"]);
        assert_eq!(field_of(parse_submission(&body).unwrap_err()), "case_studies[0]");
    }

    #[test]
    fn contact_email_is_free_text() {
        let mut body = minimal();
        body["contact_email"] = json!(" ops@localhost ");
        let draft = parse_submission(&body).unwrap();
        assert_eq!(draft.fields.company.contact_email.as_deref(), Some("ops@localhost"));

        body["contact_email"] = json!(42);
        assert_eq!(field_of(parse_submission(&body).unwrap_err()), "contact_email");
    }

    #[test]
    fn blank_canonical_key_falls_back_to_alias() {
        let mut body = minimal();
        body["segments"] = json!([{
            "segment_name": "",
            "name": "SMB",
            "revenue_percentage": " ",
            "revenue_pct": 40,
        }]);
        body["personas"] = json!([{"job_title": "  ", "title": "CTO"}]);
        let draft = parse_submission(&body).unwrap();
        assert_eq!(draft.segments[0].segment_name, "SMB");
        assert_eq!(draft.segments[0].revenue_percentage, Some(40));
        assert_eq!(draft.personas[0].job_title, "CTO");

        body["segments"] = json!([{"segment_name": "", "name": " "}]);
        assert_eq!(field_of(parse_submission(&body).unwrap_err()), "segments[0].segment_name");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut body = minimal();
        body["utm_source"] = json!("newsletter");
        assert!(parse_submission(&body).is_ok());
    }
}
