use serde::Deserialize;

/// 创建或更新用户的请求体，缺失字段按空字符串处理，id 字段被忽略
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserInput {
    pub name: String,
    pub email: String,
}

/// 分页参数保持原始字符串，由服务层宽松解析
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_input_tolerates_missing_and_extra_fields() {
        let input: UserInput = serde_json::from_str(r#"{"id":"9","name":"Ann"}"#).unwrap();
        assert_eq!(input.name, "Ann");
        assert_eq!(input.email, "");
    }

    #[test]
    fn user_input_rejects_wrong_types() {
        assert!(serde_json::from_str::<UserInput>(r#"{"name": 5}"#).is_err());
        assert!(serde_json::from_str::<UserInput>("not json").is_err());
    }
}
