//! Message formatting utilities for terminal display.

use calypso_shared::time::format_clock_time;

use crate::{
    log::Log,
    settings::{SettingsPanel, Toggle},
};

/// Message formatter for terminal display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format one appended log line
    ///
    /// # Arguments
    ///
    /// * `line` - The unescaped log text
    /// * `at` - Unix timestamp when the line was appended (milliseconds)
    pub fn format_log_line(line: &str, at: i64) -> String {
        format!("\n[{}] {}\n", format_clock_time(at), line)
    }

    /// Format the current toggle states, one per line
    pub fn format_settings(panel: &SettingsPanel) -> String {
        let mut output = String::from("\n");
        for toggle in Toggle::ALL {
            let mark = if panel.get(toggle) { "x" } else { " " };
            output.push_str(&format!("[{}] {}\n", mark, toggle));
        }
        output
    }

    /// Format the rendered HTML log with its line count
    pub fn format_rendered_log(log: &Log) -> String {
        if log.is_empty() {
            "\n(log is empty)\n".to_string()
        } else {
            format!("\n({} lines)\n{}\n", log.len(), log.render())
        }
    }

    /// Format the command reference
    pub fn format_help() -> String {
        "\n\
         connect                  open a new connection (the old one is left open)\n\
         close                    send 'type: close' and close the connection\n\
         button                   send the greeting\n\
         settings                 send the seven settings\n\
         set <setting> <on|off>   change a setting\n\
         toggle <setting>         flip a setting\n\
         show                     list the settings\n\
         file <path>              upload a script\n\
         log                      print the HTML log\n\
         quit                     exit\n"
            .to_string()
    }

    /// Format a rejected input line
    pub fn format_input_error(error: &str) -> String {
        format!("! {}\n", error)
    }
}
