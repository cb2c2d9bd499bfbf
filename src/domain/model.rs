use chrono::{NaiveDateTime, Timelike};
use mongodb::bson::{doc, Bson, Document};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A source table together with the collection it is copied into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Users,
    Imc,
}

impl Table {
    /// Transfer order. Users come first so every `imc.user_id` already has
    /// its target document when measurements are written.
    pub const ALL: [Table; 2] = [Table::Users, Table::Imc];

    pub fn source_name(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Imc => "imc",
        }
    }

    pub fn collection(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Imc => "imc",
        }
    }

    /// Column projection, in the positional order documents are built from.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::Users => &["id", "email", "password"],
            Table::Imc => &[
                "id",
                "peso",
                "altura",
                "imc",
                "categoria",
                "fecha",
                "user_id",
            ],
        }
    }

    pub fn progress_line(&self) -> &'static str {
        match self {
            Table::Users => "✔ Usuarios migrados",
            Table::Imc => "✔ Registros IMC migrados",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.source_name())
    }
}

/// Row of the `users` table. The password is an opaque (already hashed) string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRow {
    pub id: i32,
    pub email: String,
    pub password: String,
}

/// Row of the `imc` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImcRow {
    pub id: i32,
    pub peso: f64,
    pub altura: f64,
    pub imc: f64,
    pub categoria: String,
    pub fecha: Option<NaiveDateTime>,
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "table", rename_all = "lowercase")]
pub enum Record {
    User(UserRow),
    Imc(ImcRow),
}

impl Record {
    pub fn id(&self) -> i32 {
        match self {
            Record::User(row) => row.id,
            Record::Imc(row) => row.id,
        }
    }

    pub fn table(&self) -> Table {
        match self {
            Record::User(_) => Table::Users,
            Record::Imc(_) => Table::Imc,
        }
    }

    /// Builds the sink document. The source id becomes `_id` unchanged so
    /// `user_id` references stay valid after the move.
    pub fn to_document(&self) -> Document {
        match self {
            Record::User(row) => doc! {
                "_id": row.id,
                "email": row.email.as_str(),
                "password": row.password.as_str(),
            },
            Record::Imc(row) => {
                let fecha = match &row.fecha {
                    Some(value) => Bson::String(iso_datetime(value)),
                    None => Bson::Null,
                };
                let user_id = match row.user_id {
                    Some(id) => Bson::Int32(id),
                    None => Bson::Null,
                };
                doc! {
                    "_id": row.id,
                    "peso": row.peso,
                    "altura": row.altura,
                    "imc": row.imc,
                    "categoria": row.categoria.as_str(),
                    "fecha": fecha,
                    "user_id": user_id,
                }
            }
        }
    }
}

impl From<UserRow> for Record {
    fn from(row: UserRow) -> Self {
        Record::User(row)
    }
}

impl From<ImcRow> for Record {
    fn from(row: ImcRow) -> Self {
        Record::Imc(row)
    }
}

/// ISO-8601 text of a naive timestamp: `YYYY-MM-DDTHH:MM:SS`, followed by
/// `.ffffff` only when the microsecond part is non-zero.
pub fn iso_datetime(value: &NaiveDateTime) -> String {
    let micros = value.nanosecond() / 1_000;
    if micros == 0 {
        value.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        format!("{}.{:06}", value.format("%Y-%m-%dT%H:%M:%S"), micros)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferStats {
    pub table: Table,
    pub collection: String,
    pub rows_read: usize,
    pub documents_written: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    pub tables: Vec<TransferStats>,
    pub elapsed: Duration,
}

impl MigrationReport {
    pub fn documents_written(&self) -> u64 {
        self.tables.iter().map(|t| t.documents_written).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp(h: u32, m: u32, s: u32, micro: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 1)
            .unwrap()
            .and_hms_micro_opt(h, m, s, micro)
            .unwrap()
    }

    #[test]
    fn test_user_document() {
        let record = Record::from(UserRow {
            id: 7,
            email: "a@example.com".to_string(),
            password: "hash123".to_string(),
        });

        let document = record.to_document();
        assert_eq!(
            document,
            doc! { "_id": 7, "email": "a@example.com", "password": "hash123" }
        );
    }

    #[test]
    fn test_imc_document_with_null_fecha() {
        let record = Record::from(ImcRow {
            id: 3,
            peso: 70.5,
            altura: 1.75,
            imc: 23.0,
            categoria: "normal".to_string(),
            fecha: None,
            user_id: Some(7),
        });

        let document = record.to_document();
        assert_eq!(
            document,
            doc! {
                "_id": 3,
                "peso": 70.5,
                "altura": 1.75,
                "imc": 23.0,
                "categoria": "normal",
                "fecha": Bson::Null,
                "user_id": 7,
            }
        );
        assert_eq!(document.get("fecha"), Some(&Bson::Null));
    }

    #[test]
    fn test_imc_document_keeps_field_order() {
        let record = Record::from(ImcRow {
            id: 1,
            peso: 60.0,
            altura: 1.7,
            imc: 20.76,
            categoria: "Normal".to_string(),
            fecha: Some(timestamp(10, 0, 0, 0)),
            user_id: None,
        });

        let document = record.to_document();
        let keys: Vec<&str> = document.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["_id", "peso", "altura", "imc", "categoria", "fecha", "user_id"]
        );
        assert_eq!(document.get_str("fecha").unwrap(), "2025-09-01T10:00:00");
        assert_eq!(document.get("user_id"), Some(&Bson::Null));
    }

    #[test]
    fn test_iso_datetime() {
        assert_eq!(iso_datetime(&timestamp(14, 5, 9, 0)), "2025-09-01T14:05:09");
        assert_eq!(
            iso_datetime(&timestamp(14, 5, 9, 1_500)),
            "2025-09-01T14:05:09.001500"
        );
    }

    #[test]
    fn test_table_metadata() {
        assert_eq!(Table::ALL, [Table::Users, Table::Imc]);
        assert_eq!(Table::Users.collection(), "users");
        assert_eq!(Table::Imc.collection(), "imc");
        assert_eq!(Table::Users.columns(), &["id", "email", "password"]);
    }

    #[test]
    fn test_progress_lines() {
        assert_eq!(Table::Users.progress_line(), "✔ Usuarios migrados");
        assert_eq!(Table::Imc.progress_line(), "✔ Registros IMC migrados");
    }
}
