//! Listening-port lookup through `lsof`.

use crate::exec::{CommandRunner, CommandSpec};

/// Pids listening on TCP `port`, read from `lsof -t`.
pub fn listening_pids(runner: &dyn CommandRunner, port: u16) -> anyhow::Result<Vec<u32>> {
    let spec = CommandSpec::new("lsof").args([
        "-nP".to_string(),
        format!("-iTCP:{port}"),
        "-sTCP:LISTEN".to_string(),
        "-t".to_string(),
    ]);
    let output = runner.run(&spec)?;
    // lsof exits non-zero when nothing matches
    if !output.success {
        return Ok(Vec::new());
    }
    Ok(parse_pid_lines(&output.stdout))
}

/// One pid per line, duplicates dropped.
pub fn parse_pid_lines(output: &str) -> Vec<u32> {
    let mut pids = Vec::new();
    for pid in output.lines().filter_map(|l| l.trim().parse::<u32>().ok()) {
        if !pids.contains(&pid) {
            pids.push(pid);
        }
    }
    pids
}
