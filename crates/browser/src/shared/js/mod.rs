pub mod preload;
pub mod page;

use serde_json::Value;

pub fn build_js_call(func: &str, args: &[Value]) -> String {
    let args_str = args.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("({})({})", func, args_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn arguments_are_json_encoded() {
        let js = build_js_call("(id, url) => id + url", &[json!("c-1"), json!("a\"b.jpg")]);
        assert_eq!(js, r#"((id, url) => id + url)("c-1", "a\"b.jpg")"#);
    }

    #[test]
    fn no_arguments() {
        assert_eq!(build_js_call("() => 1", &[]), "(() => 1)()");
    }
}
