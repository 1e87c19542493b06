//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table, and its name matches
//! the `name` column of that table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Lowercase name as stored in the lookup table and shown to clients.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            /// Resolve a database status ID. Returns `None` for unknown IDs.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Resolve a lowercase status name. Returns `None` for unknown names.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $label => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

define_status_enum! {
    /// Video generation job status.
    ///
    /// `Completed` and `Failed` are terminal: once a job reaches either, no
    /// further transition is applied.
    VideoStatus {
        Generating = 1 => "generating",
        Processing = 2 => "processing",
        Completed = 3 => "completed",
        Failed = 4 => "failed",
    }
}

impl VideoStatus {
    /// Whether the status is terminal (completed or failed).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Terminal video statuses, for `NOT IN (...)` guards in SQL.
pub const TERMINAL_VIDEO_STATUSES: [StatusId; 2] = [
    VideoStatus::Completed as StatusId,
    VideoStatus::Failed as StatusId,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_status_ids_match_seed_data() {
        assert_eq!(VideoStatus::Generating.id(), 1);
        assert_eq!(VideoStatus::Processing.id(), 2);
        assert_eq!(VideoStatus::Completed.id(), 3);
        assert_eq!(VideoStatus::Failed.id(), 4);
    }

    #[test]
    fn status_into_status_id() {
        let id: StatusId = VideoStatus::Processing.into();
        assert_eq!(id, 2);
    }

    #[test]
    fn from_id_and_name_resolve_known_values() {
        assert_eq!(VideoStatus::from_id(3), Some(VideoStatus::Completed));
        assert_eq!(VideoStatus::from_id(9), None);
        assert_eq!(VideoStatus::from_name("failed"), Some(VideoStatus::Failed));
        assert_eq!(VideoStatus::from_name("FAILED"), None);
    }

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(!VideoStatus::Generating.is_terminal());
        assert!(!VideoStatus::Processing.is_terminal());
        assert!(VideoStatus::Completed.is_terminal());
        assert!(VideoStatus::Failed.is_terminal());
    }

    #[test]
    fn serializes_as_lowercase_name() {
        let json = serde_json::to_value(VideoStatus::Processing).unwrap();
        assert_eq!(json, serde_json::json!("processing"));
    }
}
