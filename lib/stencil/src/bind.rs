//! Variable binding.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{Error, Expander, RequestTemplate, Result, Value, Variables};

/// The argument at `index`, or an error naming the missing position.
pub(crate) fn argument(argv: &[Value], index: usize) -> Result<&Value> {
    argv.get(index).ok_or_else(|| {
        Error::invalid_argument(format!(
            "argument {index} is out of range ({} arguments)",
            argv.len()
        ))
    })
}

/// Bind every named position of `argv` to its variable names.
///
/// A position with an expander is converted first: element by element for
/// lists (null elements are dropped), once for any other value. Null values
/// are bound as is, so optional parameters stay optional.
pub fn bind_variables(
    argv: &[Value],
    index_to_name: &BTreeMap<usize, Vec<String>>,
    expanders: &BTreeMap<usize, Arc<dyn Expander>>,
) -> Result<Variables> {
    let mut variables = Variables::new();
    for (&index, names) in index_to_name {
        let value = argument(argv, index)?;
        let value = match expanders.get(&index) {
            Some(expander) => expand_value(expander.as_ref(), value)?,
            None => value.clone(),
        };
        for name in names {
            variables.insert(name.clone(), value.clone());
        }
    }
    Ok(variables)
}

fn expand_value(expander: &dyn Expander, value: &Value) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::List(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| expander.expand(item).map(Value::Str))
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        other => expander.expand(other).map(Value::Str),
    }
}

/// Replace the template target with the argument at `index`.
///
/// `argv` is the raw argument vector, before aggregate expansion.
pub(crate) fn override_target(
    template: &mut RequestTemplate,
    argv: &[Value],
    index: usize,
) -> Result<()> {
    let value = argument(argv, index)?;
    if value.is_null() {
        return Err(Error::invalid_argument(format!(
            "URI parameter {index} was null"
        )));
    }
    template.set_target(value.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::Method;

    fn names(entries: &[(usize, &[&str])]) -> BTreeMap<usize, Vec<String>> {
        entries
            .iter()
            .map(|(index, names)| (*index, names.iter().map(ToString::to_string).collect()))
            .collect()
    }

    fn upper() -> Arc<dyn Expander> {
        Arc::new(|value: &Value| -> Result<String> { Ok(value.to_string().to_uppercase()) })
    }

    #[test]
    fn binds_aliases_to_the_same_value() {
        let argv = vec![Value::from("x"), Value::from(2)];
        let variables =
            bind_variables(&argv, &names(&[(0, &["a", "alias"]), (1, &["b"])]), &BTreeMap::new())
                .expect("bind");

        check!(variables.get("a") == Some(&Value::from("x")));
        check!(variables.get("alias") == Some(&Value::from("x")));
        check!(variables.get("b") == Some(&Value::from(2)));
    }

    #[test]
    fn expander_runs_per_element() {
        let argv = vec![Value::list([Some("a"), None, Some("b")])];
        let expanders = BTreeMap::from([(0, upper())]);

        let variables = bind_variables(&argv, &names(&[(0, &["v"])]), &expanders).expect("bind");

        check!(variables.get("v") == Some(&Value::list(["A", "B"])));
    }

    #[test]
    fn expander_skips_null() {
        let argv = vec![Value::Null];
        let expanders = BTreeMap::from([(0, upper())]);

        let variables = bind_variables(&argv, &names(&[(0, &["v"])]), &expanders).expect("bind");

        check!(variables.get("v") == Some(&Value::Null));
    }

    #[test]
    fn expander_errors_propagate() {
        let failing: Arc<dyn Expander> =
            Arc::new(|_: &Value| -> Result<String> { Err(Error::invalid_argument("nope")) });
        let argv = vec![Value::from(1)];

        let result = bind_variables(
            &argv,
            &names(&[(0, &["v"])]),
            &BTreeMap::from([(0, failing)]),
        );

        let_assert!(Err(err) = result);
        check!(err.is_invalid_argument());
    }

    #[test]
    fn out_of_range_position_is_rejected() {
        let result = bind_variables(&[], &names(&[(3, &["v"])]), &BTreeMap::new());

        let_assert!(Err(err) = result);
        check!(err.to_string().contains("argument 3"));
    }

    #[test]
    fn target_override_requires_a_value() {
        let mut template = RequestTemplate::new(Method::Get, "/");

        override_target(&mut template, &[Value::from("http://other:1")], 0).expect("override");
        check!(template.target() == Some("http://other:1"));

        let_assert!(Err(err) = override_target(&mut template, &[Value::Null], 0));
        check!(err.to_string().contains("URI parameter 0 was null"));
    }
}
