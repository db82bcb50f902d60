use crate::ast::{Assumption, Event, Expr, Pattern, Property};
use crate::error::SanityError;

/// Validate alias bindings of a property.
///
/// Aliases become visible in this order: the activator's to every other
/// event; the trigger's to the behaviour. The trigger of a requirement may
/// also refer to the behaviour it precedes. The terminator sees only the
/// activator.
pub fn check_property(property: &Property) -> Result<(), SanityError> {
    let mut initial: Vec<&str> = Vec::new();
    if let Some(activator) = property.scope.activator() {
        check_event(activator, &initial)?;
        initial.extend(activator.alias.as_deref());
    }

    let pattern = &property.pattern;
    let mut available = initial.clone();
    if let Some(trigger) = pattern.trigger() {
        let mut visible = initial.clone();
        if let Pattern::Requirement { behaviour, .. } = pattern {
            visible.extend(behaviour.alias.as_deref());
        }
        check_refs_defined(trigger, &visible)?;
        check_duplicates(trigger, &initial)?;
        check_variables(trigger, &visible)?;
        available.extend(trigger.alias.as_deref());
    }

    check_event(pattern.behaviour(), &available)?;

    if let Some(terminator) = property.scope.terminator() {
        check_event(terminator, &initial)?;
    }
    Ok(())
}

/// Assumption guards are evaluated on a single message: no alias is
/// visible.
pub fn check_assumption(assumption: &Assumption) -> Result<(), SanityError> {
    let refs = assumption.predicate.condition.free_references();
    if let Some(name) = refs.first() {
        return Err(SanityError(format!(
            "reference to undefined event: '{name}'"
        )));
    }
    check_shadowing(&assumption.predicate.condition, &[], &mut Vec::new())
}

/// A bare predicate may refer to any alias; only quantifier scoping is
/// checked.
pub fn check_predicate(condition: &Expr) -> Result<(), SanityError> {
    check_shadowing(condition, &[], &mut Vec::new())
}

fn check_event(event: &Event, available: &[&str]) -> Result<(), SanityError> {
    check_refs_defined(event, available)?;
    check_duplicates(event, available)?;
    check_variables(event, available)
}

fn check_refs_defined(event: &Event, available: &[&str]) -> Result<(), SanityError> {
    for name in event.external_references() {
        if event.alias.as_deref() == Some(name) {
            return Err(SanityError(format!(
                "self-referential alias: '{name}' in event '{}'",
                event.topic
            )));
        }
        if !available.contains(&name) {
            return Err(SanityError(format!(
                "reference to undefined event: '{name}'"
            )));
        }
    }
    Ok(())
}

fn check_duplicates(event: &Event, available: &[&str]) -> Result<(), SanityError> {
    match event.alias.as_deref() {
        Some(alias) if available.contains(&alias) => {
            Err(SanityError(format!("duplicate alias: '{alias}'")))
        }
        _ => Ok(()),
    }
}

fn check_variables(event: &Event, available: &[&str]) -> Result<(), SanityError> {
    let mut visible = available.to_vec();
    visible.extend(event.alias.as_deref());
    check_shadowing(&event.predicate.condition, &visible, &mut Vec::new())
}

/// Quantified variables may hide neither an alias nor an enclosing
/// variable.
fn check_shadowing<'e>(
    expr: &'e Expr,
    aliases: &[&str],
    bound: &mut Vec<&'e str>,
) -> Result<(), SanityError> {
    if let Expr::Quantifier {
        variable,
        domain,
        body,
        ..
    } = expr
    {
        check_shadowing(domain, aliases, bound)?;
        let var = variable.as_str();
        if aliases.contains(&var) || bound.contains(&var) {
            return Err(SanityError(format!("variable shadows '{var}'")));
        }
        bound.push(var);
        let result = check_shadowing(body, aliases, bound);
        bound.pop();
        return result;
    }
    for child in expr.children() {
        check_shadowing(child, aliases, bound)?;
    }
    Ok(())
}
