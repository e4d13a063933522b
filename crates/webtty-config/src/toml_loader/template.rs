//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# webtty configuration
# Only override what you want to change -- missing fields use defaults.

[server]
# address = "0.0.0.0"
# port = 8080              # 1-65535
# max_connections = 0      # 0 = unlimited

[command]
# program = ""             # empty = $SHELL, falling back to /bin/sh
# args = []
# working_directory = "/home/me"
#
# [command.env]
# EDITOR = "vim"

[session]
# title = ""               # empty = "<program>@<host>"
# permit_write = false     # let clients type into the terminal
# columns = 0              # 0-1000, 0 = follow the client
# rows = 0                 # 0-1000, 0 = follow the client
# reconnect = 0            # seconds, 0-86400, 0 = no reconnect hint
# buffer_size = 1024       # bytes, 1-1048576
#
# [session.preferences]    # forwarded to the browser terminal as JSON
# font-size = 14

[audit]
# enabled = false
# endpoint = "http://collector.example.com/audit"
# cluster = ""
# timeout_secs = 10        # 1-300

[logging]
# level = "info"           # trace, debug, info, warn, error
"##
}
