//! Selection checking against a service's document requirements.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::*;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementCheck {
    pub required: u32,
    pub selected: u32,
    pub met: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingCategory {
    pub category: DocumentCategory,
    pub needed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingPriority {
    pub priority: Priority,
    pub needed: u32,
}

/// Outcome of checking a user's document selection against one service's
/// rules.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionVerdict {
    pub is_valid: bool,
    pub selected_count: u32,
    pub total_required: u32,
    pub minimum_threshold: u32,
    pub meets_threshold: bool,
    pub category_validation: BTreeMap<String, RequirementCheck>,
    pub priority_validation: BTreeMap<u8, RequirementCheck>,
    pub category_requirements_met: bool,
    pub priority_requirements_met: bool,
    pub missing_categories: Vec<MissingCategory>,
    pub missing_priorities: Vec<MissingPriority>,
    pub can_proceed: bool,
    pub completion_percentage: u32,
    pub message: String,
}

/// Check a selection of requirement-document ids against the set's rules.
/// Ids that match no requirement document still count toward the threshold
/// but contribute to no category or priority.
pub fn validate_selection(set: &RequirementSet, selected_ids: &[String]) -> SelectionVerdict {
    let rules = &set.validation_rules;
    let selected_count = selected_ids.len() as u32;
    let meets_threshold = selected_count >= rules.minimum_threshold;

    let mut category_counts: BTreeMap<&str, u32> = BTreeMap::new();
    let mut priority_counts: BTreeMap<u8, u32> = BTreeMap::new();
    for id in selected_ids {
        let Some(document) = set.documents.iter().find(|d| &d.id == id) else {
            continue;
        };
        *category_counts.entry(document.category.as_str()).or_default() += 1;
        *priority_counts.entry(u8::from(document.priority)).or_default() += 1;
    }

    let mut issues = Vec::new();
    if !meets_threshold {
        issues.push(format!(
            "You need at least {} documents (currently have {})",
            rules.minimum_threshold, selected_count
        ));
    }

    let mut category_validation = BTreeMap::new();
    let mut missing_categories = Vec::new();
    for requirement in &rules.category_requirements {
        let selected = category_counts
            .get(requirement.category.as_str())
            .copied()
            .unwrap_or(0);
        let met = selected >= requirement.minimum_required;
        if !met {
            let needed = requirement.minimum_required - selected;
            issues.push(format!(
                "Need {} more {} document(s)",
                needed,
                requirement.category.as_str()
            ));
            missing_categories.push(MissingCategory {
                category: requirement.category.clone(),
                needed,
            });
        }
        category_validation.insert(
            requirement.category.as_str().to_string(),
            RequirementCheck {
                required: requirement.minimum_required,
                selected,
                met,
                description: requirement.description.clone(),
            },
        );
    }
    let category_requirements_met = category_validation.values().all(|c| c.met);

    let mut priority_validation = BTreeMap::new();
    let mut missing_priorities = Vec::new();
    for requirement in &rules.priority_requirements {
        let selected = priority_counts
            .get(&u8::from(requirement.priority))
            .copied()
            .unwrap_or(0);
        let met = selected >= requirement.minimum_required;
        if !met {
            let needed = requirement.minimum_required - selected;
            issues.push(format!(
                "Need {} more {} document(s)",
                needed,
                requirement.priority.label()
            ));
            missing_priorities.push(MissingPriority {
                priority: requirement.priority,
                needed,
            });
        }
        priority_validation.insert(
            u8::from(requirement.priority),
            RequirementCheck {
                required: requirement.minimum_required,
                selected,
                met,
                description: requirement.description.clone(),
            },
        );
    }
    let priority_requirements_met = priority_validation.values().all(|c| c.met);

    let is_valid = meets_threshold && category_requirements_met && priority_requirements_met;
    let completion_percentage = if rules.total_required == 0 {
        0
    } else {
        ((selected_count as f64 / rules.total_required as f64) * 100.0).round() as u32
    };

    let message = if is_valid {
        format!(
            "Great! You have selected {selected_count} documents which meets the minimum requirement. You can proceed to center selection."
        )
    } else {
        format!("Please select additional documents: {}.", issues.join(", "))
    };

    SelectionVerdict {
        is_valid,
        selected_count,
        total_required: rules.total_required,
        minimum_threshold: rules.minimum_threshold,
        meets_threshold,
        category_validation,
        priority_validation,
        category_requirements_met,
        priority_requirements_met,
        missing_categories,
        missing_priorities,
        can_proceed: is_valid,
        completion_percentage,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn requirement_document(
        id: &str,
        category: DocumentCategory,
        priority: Priority,
    ) -> RequiredDocument {
        RequiredDocument {
            id: id.to_string(),
            name: id.replace('_', " "),
            description: String::new(),
            category,
            is_required: true,
            priority,
            alternatives: Vec::new(),
            notes: None,
            validity_period: None,
            acceptable_formats: Vec::new(),
        }
    }

    fn income_certificate_set() -> RequirementSet {
        let now = Utc::now();
        RequirementSet {
            service_id: "income_certificate".to_string(),
            documents: vec![
                requirement_document("aadhaar_card", DocumentCategory::Identity, Priority::High),
                requirement_document("ration_card", DocumentCategory::Address, Priority::Medium),
                requirement_document("salary_slip", DocumentCategory::Income, Priority::High),
                requirement_document("pan_card", DocumentCategory::Identity, Priority::Low),
            ],
            validation_rules: ValidationRules {
                total_required: 3,
                minimum_threshold: 2,
                category_requirements: vec![
                    CategoryRequirement {
                        category: DocumentCategory::Identity,
                        minimum_required: 1,
                        description: Some("At least one identity document".to_string()),
                    },
                    CategoryRequirement {
                        category: DocumentCategory::Income,
                        minimum_required: 1,
                        description: Some("At least one income proof".to_string()),
                    },
                ],
                priority_requirements: vec![PriorityRequirement {
                    priority: Priority::High,
                    minimum_required: 1,
                    description: Some("At least one high priority document".to_string()),
                }],
            },
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            staff_instructions: DEFAULT_STAFF_INSTRUCTIONS.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn valid_selection_passes_all_rules() {
        let verdict =
            validate_selection(&income_certificate_set(), &ids(&["aadhaar_card", "salary_slip"]));

        assert!(verdict.is_valid);
        assert!(verdict.can_proceed);
        assert!(verdict.meets_threshold);
        assert_eq!(verdict.selected_count, 2);
        assert_eq!(verdict.completion_percentage, 67);
        assert_eq!(
            verdict.message,
            "Great! You have selected 2 documents which meets the minimum requirement. You can proceed to center selection."
        );
        assert!(verdict.category_validation["identity"].met);
        assert!(verdict.category_validation["income"].met);
        assert!(verdict.priority_validation[&1].met);
        assert!(verdict.missing_categories.is_empty());
    }

    #[test]
    fn below_threshold_lists_the_shortfall_first() {
        let verdict = validate_selection(&income_certificate_set(), &ids(&["aadhaar_card"]));

        assert!(!verdict.is_valid);
        assert!(!verdict.meets_threshold);
        assert_eq!(verdict.completion_percentage, 33);
        assert_eq!(
            verdict.message,
            "Please select additional documents: You need at least 2 documents (currently have 1), Need 1 more income document(s)."
        );
        assert_eq!(
            verdict.missing_categories,
            vec![MissingCategory {
                category: DocumentCategory::Income,
                needed: 1
            }]
        );
    }

    #[test]
    fn priority_shortfall_uses_the_label() {
        let verdict = validate_selection(&income_certificate_set(), &ids(&["pan_card"]));

        assert!(!verdict.is_valid);
        assert!(verdict.category_validation["identity"].met);
        assert!(!verdict.priority_validation[&1].met);
        assert_eq!(
            verdict.missing_priorities,
            vec![MissingPriority {
                priority: Priority::High,
                needed: 1
            }]
        );
        assert_eq!(
            verdict.message,
            "Please select additional documents: You need at least 2 documents (currently have 1), Need 1 more income document(s), Need 1 more high priority document(s)."
        );
    }

    #[test]
    fn unknown_ids_count_only_toward_the_threshold() {
        let verdict =
            validate_selection(&income_certificate_set(), &ids(&["aadhaar_card", "bogus"]));

        assert!(verdict.meets_threshold);
        assert!(!verdict.is_valid);
        assert_eq!(verdict.selected_count, 2);
        assert_eq!(verdict.category_validation["identity"].selected, 1);
        assert_eq!(verdict.category_validation["income"].selected, 0);
    }

    #[test]
    fn duplicate_ids_double_count() {
        let verdict = validate_selection(
            &income_certificate_set(),
            &ids(&["aadhaar_card", "aadhaar_card"]),
        );

        assert_eq!(verdict.selected_count, 2);
        assert_eq!(verdict.category_validation["identity"].selected, 2);
        assert!(!verdict.is_valid);
    }

    #[test]
    fn zero_total_required_yields_zero_completion() {
        let mut set = income_certificate_set();
        set.validation_rules.total_required = 0;
        let verdict = validate_selection(&set, &ids(&["aadhaar_card"]));
        assert_eq!(verdict.completion_percentage, 0);
    }

    #[test]
    fn empty_selection_fails_with_threshold_message() {
        let verdict = validate_selection(&income_certificate_set(), &[]);
        assert!(!verdict.is_valid);
        assert_eq!(verdict.selected_count, 0);
        assert_eq!(verdict.completion_percentage, 0);
        assert!(verdict
            .message
            .starts_with("Please select additional documents: You need at least 2 documents (currently have 0)"));
    }
}
