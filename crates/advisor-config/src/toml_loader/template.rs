//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Advisor Configuration
# Only override what you want to change -- missing fields use defaults.
# Environment variables win over this file: GEMINI_API_KEY, MODEL_NAME,
# SYSTEM_PROMPT_FILE, BACKEND_URL, REDIS_URL, HOST, PORT.

[model]
# api_key = ""                 # prefer GEMINI_API_KEY
# name = "gemini-1.5-flash"
# max_tokens = 4096
# temperature = 0.7            # 0.0-2.0
# system_prompt_file = "prompt.txt"

[backend]
# url = "http://localhost:8081/"

[session]
# ttl_hours = 24               # 1-720
# redis_url = "redis://localhost:6379/0"   # in-memory when unset

[chat]
# max_rounds = 10              # 1-50, used by /chat/message
# max_stream_rounds = 5        # 1-50, used by /chat/stream
# serialize_sessions = true

[server]
# host = "0.0.0.0"
# port = 8000

[logging]
# level = "advisor=info"
"##
    .to_string()
}
