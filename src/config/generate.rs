pub fn generate_starter_config() -> String {
    r#"# =============================================================================
# LOGSHARE CONFIGURATION
# =============================================================================
# Config file locations (in order of precedence):
#   1. Path specified via --config argument
#   2. ~/.config/logshare/config.yml
#   3. /etc/logshare/config.yml
#
# Any value may reference an environment variable as $env{NAME}.

# -----------------------------------------------------------------------------
# AWS
# -----------------------------------------------------------------------------
# Credentials come from the standard AWS provider chain. Leave region unset to
# use the chain's region as well.
aws:
  # region: af-south-1
  # endpoint_url: http://localhost:4566   # LocalStack
  force_path_style: false

# -----------------------------------------------------------------------------
# LOG RETRIEVAL
# -----------------------------------------------------------------------------
logs:
  # Newest entries fetched per report
  max_entries: 10000
  # Tail pages requested before giving up on a stream
  max_pages: 50

# -----------------------------------------------------------------------------
# PUBLISHING
# -----------------------------------------------------------------------------
publish:
  bucket: $env{S3_BUCKET_NAME}
  key_prefix: log-reports
  # How long download links stay valid (max 7 days)
  link_ttl: 15m

# -----------------------------------------------------------------------------
# AUTHORIZATION
# -----------------------------------------------------------------------------
# backend: duckdb reads users(user_id VARCHAR, is_super_user BOOLEAN)
# backend: static takes a fixed list of super-user ids
auth:
  backend: duckdb
  path: ~/.local/share/logshare/users.duckdb
  # backend: static
  # super_users:
  #   - 00000000-0000-0000-0000-000000000000

# -----------------------------------------------------------------------------
# WEB
# -----------------------------------------------------------------------------
web:
  listen: 0.0.0.0:8080

# -----------------------------------------------------------------------------
# MAPPINGS (optional)
# -----------------------------------------------------------------------------
# Replaces the built-in workload table. Category and name are matched without
# regard to case.
# mappings:
#   - category: scrapers
#     name: eTenderLambda
#     group: /aws/lambda/eTendersLambda
"#
    .to_string()
}
