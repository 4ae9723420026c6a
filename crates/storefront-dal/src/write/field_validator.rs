// File: storefront-dal/src/write/field_validator.rs
// Purpose: Run constraints for one field and decide whether a field needs checking

use super::error::InvalidFieldError;
use super::existence::EntityExistence;
use crate::field::{Field, FieldFlag};
use crate::validation::{Constraint, ConstraintValidator, ConstraintViolationList};
use serde_json::Value;

/// Check `value` against every constraint and collect all violations
///
/// Each violation is re-tagged with `field_name` as its property path; every
/// other attribute is kept. Fails once, after all constraints were evaluated,
/// with the composed path `path/field_name`.
pub fn validate<V>(
    validator: &V,
    constraints: &[Constraint],
    field_name: &str,
    value: &Value,
    path: &str,
) -> Result<(), InvalidFieldError>
where
    V: ConstraintValidator + ?Sized,
{
    let mut violation_list = ConstraintViolationList::new();

    for constraint in constraints {
        for violation in validator.validate(value, constraint) {
            violation_list.add(violation.with_property_path(field_name));
        }
    }

    if violation_list.is_empty() {
        return Ok(());
    }

    Err(InvalidFieldError::new(
        format!("{path}/{field_name}"),
        violation_list,
    ))
}

/// Whether `validate` must run for this field
///
/// A present value is always checked. A missing inherited value on a child row
/// is skipped, since it resolves from the parent. Otherwise only required
/// fields are checked. A field that is both required and inherited is skipped
/// on a child.
pub fn requires_validation(field: &Field, existence: &EntityExistence, value: Option<&Value>) -> bool {
    if value.is_some_and(|v| !v.is_null()) {
        return true;
    }

    if field.is(FieldFlag::Inherited) && existence.is_child() {
        return false;
    }

    field.is(FieldFlag::Required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;
    use crate::validation::{ConstraintEngine, ConstraintViolation};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    /// Reports one violation per call, tagged with the constraint name
    struct AlwaysFails;

    impl ConstraintValidator for AlwaysFails {
        fn validate(&self, value: &Value, constraint: &Constraint) -> ConstraintViolationList {
            let mut list = ConstraintViolationList::new();
            list.add(
                ConstraintViolation::new(
                    format!("{} failed", constraint.name()),
                    "{{ name }} failed",
                    value.clone(),
                )
                .with_property_path("original")
                .with_code(constraint.name())
                .with_cause("stub"),
            );
            list
        }
    }

    fn field(flags: &[FieldFlag]) -> Field {
        flags.iter().fold(
            Field::new("localeId", FieldKind::FkId { reference: "locale".into() }),
            |f, flag| f.flag(*flag),
        )
    }

    fn existence(is_child: bool) -> EntityExistence {
        EntityExistence::for_insert("language", "id", is_child)
    }

    #[test]
    fn test_zero_constraints_never_fail() {
        for value in [json!(null), json!(""), json!({"a": 1})] {
            assert!(validate(&AlwaysFails, &[], "price", &value, "product").is_ok());
        }
    }

    #[test]
    fn test_two_violating_constraints_fail_once_with_composed_path() {
        let constraints = [Constraint::NotNull, Constraint::Uuid];
        let err = validate(&AlwaysFails, &constraints, "price", &json!(12), "product").unwrap_err();

        assert_eq!(err.path, "product/price");
        assert_eq!(err.violations.len(), 2);
        assert!(err.violations.iter().all(|v| v.property_path() == "price"));

        let codes: Vec<_> = err.violations.iter().map(|v| v.code().unwrap()).collect();
        assert_eq!(codes, vec!["NotNull", "Uuid"]);
    }

    #[test]
    fn test_rewrite_keeps_other_attributes() {
        let err = validate(&AlwaysFails, &[Constraint::Uuid], "name", &json!("x"), "/0").unwrap_err();
        let violation = err.violations.get(0).unwrap();

        assert_eq!(violation.message(), "Uuid failed");
        assert_eq!(violation.message_template(), "{{ name }} failed");
        assert_eq!(violation.invalid_value(), &json!("x"));
        assert_eq!(violation.cause(), Some("stub"));
        assert_eq!(err.path, "/0/name");
    }

    #[test]
    fn test_passing_constraints_are_silent() {
        let constraints = [Constraint::not_blank(), Constraint::max_length(10)];
        assert!(validate(&ConstraintEngine, &constraints, "name", &json!("match"), "/0").is_ok());
    }

    #[test]
    fn test_only_failing_constraints_contribute() {
        let constraints = [Constraint::not_blank(), Constraint::max_length(2), Constraint::Uuid];
        let err = validate(&ConstraintEngine, &constraints, "name", &json!("match"), "/0").unwrap_err();
        assert_eq!(err.violations.len(), 2);
    }

    #[rstest]
    #[case::present_plain(&[], false, Some(json!("x")), true)]
    #[case::present_inherited_child(&[FieldFlag::Inherited], true, Some(json!("x")), true)]
    #[case::present_empty_string(&[], true, Some(json!("")), true)]
    #[case::null_inherited_child(&[FieldFlag::Inherited], true, None, false)]
    #[case::json_null_inherited_child(&[FieldFlag::Inherited], true, Some(json!(null)), false)]
    #[case::null_required_inherited_child(&[FieldFlag::Required, FieldFlag::Inherited], true, None, false)]
    #[case::null_required_inherited_root(&[FieldFlag::Required, FieldFlag::Inherited], false, None, true)]
    #[case::null_inherited_root(&[FieldFlag::Inherited], false, None, false)]
    #[case::null_required_child(&[FieldFlag::Required], true, None, true)]
    #[case::null_required_root(&[FieldFlag::Required], false, Some(json!(null)), true)]
    #[case::null_plain(&[], false, None, false)]
    fn test_requires_validation(
        #[case] flags: &[FieldFlag],
        #[case] is_child: bool,
        #[case] value: Option<Value>,
        #[case] expected: bool,
    ) {
        assert_eq!(
            requires_validation(&field(flags), &existence(is_child), value.as_ref()),
            expected
        );
    }
}
