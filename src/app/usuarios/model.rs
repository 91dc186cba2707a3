//! 用户数据模型

use serde::{de::Error as _, Deserialize, Serialize};
use serde_json::{Map, Value};

/// 用户记录。`id` 由数据库在插入时分配。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: u32,
    pub nome: String,
    pub email: String,
}

/// 创建与更新请求体。请求体中的 `id` 只做类型校验，始终被忽略。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UsuarioPayload {
    pub id: Option<u32>,
    pub nome: String,
    pub email: String,
}

const CAMPOS: [&str; 3] = ["id", "nome", "email"];

impl UsuarioPayload {
    /// 解码请求体
    ///
    /// - 请求体为 `null` 时得到零值
    /// - 值为 `null` 的字段保留零值
    /// - 键名不区分大小写，完全匹配的键优先
    /// - 未知键忽略
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let objeto = match serde_json::from_slice::<Value>(body)? {
            Value::Null => return Ok(Self::default()),
            Value::Object(objeto) => objeto,
            other => {
                return Err(serde_json::Error::custom(format!(
                    "expected a JSON object, found {}",
                    other
                )))
            }
        };

        let mut campos = Map::new();
        for (chave, valor) in objeto {
            if valor.is_null() {
                continue;
            }
            let Some(campo) = CAMPOS.iter().find(|c| c.eq_ignore_ascii_case(&chave)) else {
                continue;
            };
            let exata = chave == *campo;
            if exata || !campos.contains_key(*campo) {
                campos.insert(campo.to_string(), valor);
            }
        }

        serde_json::from_value(Value::Object(campos))
    }
}

/// 数据库行，`SERIAL` 列按 `i32` 读取
#[derive(Debug, sqlx::FromRow)]
pub struct UsuarioRow {
    pub id: i32,
    pub nome: String,
    pub email: String,
}

impl TryFrom<UsuarioRow> for Usuario {
    type Error = std::num::TryFromIntError;

    fn try_from(row: UsuarioRow) -> Result<Self, Self::Error> {
        Ok(Usuario {
            id: u32::try_from(row.id)?,
            nome: row.nome,
            email: row.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_fixed_field_names() {
        let usuario = Usuario {
            id: 1,
            nome: "Ana".to_string(),
            email: "ana@x.com".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&usuario).unwrap(),
            r#"{"id":1,"nome":"Ana","email":"ana@x.com"}"#
        );
    }

    #[test]
    fn zero_valued_record() {
        assert_eq!(
            serde_json::to_string(&Usuario::default()).unwrap(),
            r#"{"id":0,"nome":"","email":""}"#
        );
    }

    #[test]
    fn payload_fields_are_optional() {
        let payload = UsuarioPayload::from_slice(br#"{"nome":"Ana"}"#).unwrap();
        assert_eq!(payload.nome, "Ana");
        assert_eq!(payload.email, "");

        let payload =
            UsuarioPayload::from_slice(br#"{"id":9,"nome":"Bia","email":"b@x.com","extra":true}"#)
                .unwrap();
        assert_eq!(payload.id, Some(9));
        assert_eq!(payload.email, "b@x.com");
    }

    #[test]
    fn null_body_and_null_fields_keep_zero_values() {
        let payload = UsuarioPayload::from_slice(b"null").unwrap();
        assert_eq!(payload.id, None);
        assert_eq!(payload.nome, "");
        assert_eq!(payload.email, "");

        let payload =
            UsuarioPayload::from_slice(br#"{"id":null,"nome":null,"email":"a@x"}"#).unwrap();
        assert_eq!(payload.nome, "");
        assert_eq!(payload.email, "a@x");
    }

    #[test]
    fn keys_match_case_insensitively() {
        let payload = UsuarioPayload::from_slice(br#"{"NOME":"Ana","Email":"a@x","iD":3}"#).unwrap();
        assert_eq!(payload.nome, "Ana");
        assert_eq!(payload.email, "a@x");
        assert_eq!(payload.id, Some(3));

        let payload = UsuarioPayload::from_slice(br#"{"Nome":"Outra","nome":"Ana"}"#).unwrap();
        assert_eq!(payload.nome, "Ana");
    }

    #[test]
    fn payload_rejects_wrong_types() {
        assert!(UsuarioPayload::from_slice(br#"{"id":-1}"#).is_err());
        assert!(UsuarioPayload::from_slice(br#"{"nome":7}"#).is_err());
        assert!(UsuarioPayload::from_slice(br#"{"Email":false}"#).is_err());
        assert!(UsuarioPayload::from_slice(br#""texto""#).is_err());
        assert!(UsuarioPayload::from_slice(b"[]").is_err());
        assert!(UsuarioPayload::from_slice(b"").is_err());
    }

    #[test]
    fn negative_row_id_cannot_be_scanned() {
        let row = UsuarioRow {
            id: -4,
            nome: String::new(),
            email: String::new(),
        };
        assert!(Usuario::try_from(row).is_err());
    }
}
