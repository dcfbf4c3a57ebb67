/*!
 * Cluster passphrase retrieval
 *
 * The passphrase never lives in the configuration itself; an external
 * command is run and its standard output is taken as the passphrase
 * bytes. `%p` in the configured command is replaced with a prompt
 * string, `%%` with a literal percent sign.
 */

mod passphrase;

pub use passphrase::*;
