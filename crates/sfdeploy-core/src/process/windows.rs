//! Listening-port lookup through `netstat -ano`.

use crate::exec::{CommandRunner, CommandSpec};

/// Pids listening on TCP `port`, read from `netstat -ano`.
pub fn listening_pids(runner: &dyn CommandRunner, port: u16) -> anyhow::Result<Vec<u32>> {
    let output = runner.run(&CommandSpec::new("netstat").arg("-ano"))?;
    if !output.success {
        tracing::debug!(stderr = %output.stderr, "netstat failed");
        return Ok(Vec::new());
    }
    Ok(parse_netstat_listeners(&output.stdout, port))
}

/// Pids from `netstat -ano` rows whose local address ends in `:port` and are LISTENING.
pub fn parse_netstat_listeners(output: &str, port: u16) -> Vec<u32> {
    let suffix = format!(":{port}");
    let mut pids = Vec::new();
    for line in output.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 5 || !fields[0].eq_ignore_ascii_case("TCP") {
            continue;
        }
        if !fields[1].ends_with(&suffix) || !fields.contains(&"LISTENING") {
            continue;
        }
        if let Some(pid) = fields.last().and_then(|f| f.parse::<u32>().ok())
            && pid != 0
            && !pids.contains(&pid)
        {
            pids.push(pid);
        }
    }
    pids
}
