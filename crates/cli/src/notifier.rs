// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::io::Write;

use courier_lifecycle::Notifier;

/// Prints outgoing messages to stderr in place of an SMS gateway.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, phone: &str, message: &str) -> bool {
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "[sms -> {phone}] {message}").is_ok()
    }
}
