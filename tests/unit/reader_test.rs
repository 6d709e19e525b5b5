use assert_fs::prelude::*;
use metalogin::{config::reader, Configuration, MetaloginError};
use std::io::Cursor;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_destination_config_success() {
        let temp_file = assert_fs::NamedTempFile::new("config").unwrap();
        temp_file
            .write_str(
                r"apiVersion: v1
kind: Config
current-context: admin@alpha
preferences: {}
clusters:
- name: alpha
  cluster:
    certificate-authority-data: cad
    server: https://alpha:6443
contexts:
- name: admin@alpha
  context:
    cluster: alpha
    user: admin
    namespace: default
users:
- name: admin
  user:
    client-certificate-data: ccd
    client-key-data: ckd
",
            )
            .unwrap();

        let config = reader::read_destination_config(temp_file.path()).unwrap();

        assert_eq!(config.api_version, "v1");
        assert_eq!(config.kind, "Config");
        assert_eq!(config.current_context, "admin@alpha");
        assert!(config.extra.contains_key("preferences"));

        let cluster = config.lookup_cluster("alpha").unwrap();
        assert_eq!(cluster.cluster.server, "https://alpha:6443");
        let context = config.lookup_context("admin@alpha").unwrap();
        assert_eq!(context.context.user, "admin");
        assert_eq!(
            context.context.extra.get("namespace"),
            Some(&serde_yaml::Value::from("default"))
        );
        assert_eq!(config.lookup_user("admin").unwrap().user.client_key_data, "ckd");
    }

    #[test]
    fn test_read_destination_config_nonexistent_returns_empty() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        let config = reader::read_destination_config(temp_dir.child("missing").path()).unwrap();
        assert_eq!(config, Configuration::empty());
    }

    #[test]
    fn test_read_destination_config_empty_file() {
        let temp_file = assert_fs::NamedTempFile::new("config").unwrap();
        temp_file.touch().unwrap();

        let config = reader::read_destination_config(temp_file.path()).unwrap();
        assert_eq!(config, Configuration::empty());
    }

    #[test]
    fn test_read_destination_config_invalid_yaml() {
        let temp_file = assert_fs::NamedTempFile::new("config").unwrap();
        temp_file.write_str("clusters:\n  - name: [unclosed\n").unwrap();

        let result = reader::read_destination_config(temp_file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().starts_with("failed to unmarshal `"));
    }

    #[test]
    fn test_read_source_from_empty_stream() {
        let err = reader::read_source_from(Cursor::new(Vec::new())).unwrap_err();
        assert!(matches!(
            err.root_cause().downcast_ref::<MetaloginError>(),
            Some(MetaloginError::EmptyInput)
        ));
    }

    #[test]
    fn test_read_source_from_invalid_yaml() {
        let err = reader::read_source_from(Cursor::new("users: {")).unwrap_err();
        assert_eq!(err.to_string(), "failed to unmarshal configuration from the input stream");
    }
}
