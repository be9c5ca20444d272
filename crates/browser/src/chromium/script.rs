use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::page::Page;
use curtain_core::DocumentError;
use serde_json::Value;

use crate::shared::{js, to_document_error};

/// Evaluates `func` applied to `args`, awaiting a returned promise.
pub async fn call(page: &Page, func: &str, args: &[Value], action: &str) -> Result<Value, DocumentError> {
    let expression = js::build_js_call(func, args);
    let params = EvaluateParams::builder()
        .expression(expression)
        .await_promise(true)
        .return_by_value(true)
        .build()
        .map_err(|e| DocumentError::script_error(format!("{}: {}", action, e)))?;

    let result = page
        .evaluate_expression(params)
        .await
        .map_err(|e| to_document_error(e, action))?;
    Ok(result.value().cloned().unwrap_or(Value::Null))
}

/// Like [`call`] for snippets that report `{ success, error }`.
pub async fn perform(page: &Page, func: &str, args: &[Value], action: &str) -> Result<(), DocumentError> {
    let value = call(page, func, args, action).await?;
    check_success(&value, action)
}

fn check_success(value: &Value, action: &str) -> Result<(), DocumentError> {
    if value.get("success").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(());
    }
    let error = value.get("error").and_then(Value::as_str).unwrap_or("no result");
    Err(to_document_error(error, action))
}
