use crate::db::core::{NetDesc, NetlistDesc};
use anyhow::{Context, Result, anyhow};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};

/// Reads a netlist file:
///
/// ```text
/// num_cells num_connections num_rows num_cols
/// num_pins source sink_1 ... sink_{num_pins-1}
/// ...
/// ```
///
/// Only tokenization happens here; referential checks belong to
/// [`Circuit::new`](crate::db::core::Circuit::new).
pub fn parse(filename: &str) -> Result<NetlistDesc> {
    log::info!("Parsing netlist: {}", filename);
    let file =
        File::open(filename).context(format!("Failed to open netlist file: {}", filename))?;
    parse_reader(BufReader::new(file))
}

pub fn parse_str(text: &str) -> Result<NetlistDesc> {
    parse_reader(BufReader::new(text.as_bytes()))
}

fn parse_reader<R: Read>(reader: BufReader<R>) -> Result<NetlistDesc> {
    let mut header: Option<[i64; 4]> = None;
    let mut nets = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line_num = line_idx + 1;
        let line = line?;
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let values = content
            .split_whitespace()
            .map(|tok| {
                tok.parse::<i64>()
                    .map_err(|_| anyhow!("line {}: expected an integer, found '{}'", line_num, tok))
            })
            .collect::<Result<Vec<i64>>>()?;

        if header.is_none() {
            let fields: [i64; 4] = values.as_slice().try_into().map_err(|_| {
                anyhow!(
                    "line {}: header needs 4 values (cells, connections, rows, cols), found {}",
                    line_num,
                    values.len()
                )
            })?;
            header = Some(fields);
            continue;
        }

        if values.len() < 2 {
            return Err(anyhow!(
                "line {}: net needs a pin count and a source cell",
                line_num
            ));
        }
        nets.push(NetDesc {
            num_pins: values[0],
            source: values[1],
            sinks: values[2..].to_vec(),
        });
    }

    let [num_cells, num_connections, num_rows, num_cols] =
        header.ok_or_else(|| anyhow!("netlist is empty"))?;

    log::debug!(
        "Netlist header: {} cells, {} connections, {}x{} grid; {} nets read",
        num_cells,
        num_connections,
        num_cols,
        num_rows,
        nets.len()
    );

    Ok(NetlistDesc {
        num_cells,
        num_connections,
        num_rows,
        num_cols,
        nets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_header_and_nets() {
        let text = "\
# tiny design
3 2 2 2

2 0 1
3 2 0 1   # fanout of two
";
        let desc = parse_str(text).unwrap();
        assert_eq!(desc.num_cells, 3);
        assert_eq!(desc.num_connections, 2);
        assert_eq!(desc.num_rows, 2);
        assert_eq!(desc.num_cols, 2);
        assert_eq!(desc.nets.len(), 2);
        assert_eq!(
            desc.nets[1],
            NetDesc {
                num_pins: 3,
                source: 2,
                sinks: vec![0, 1],
            }
        );
    }

    #[test]
    fn reports_bad_token_with_line_number() {
        let err = parse_str("2 1 1 2\n2 0 x\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn rejects_short_header() {
        assert!(parse_str("2 1 1\n").is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse_str("\n# nothing\n").is_err());
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "2 1 1 2").unwrap();
        writeln!(file, "2 0 1").unwrap();

        let desc = parse(file.path().to_str().unwrap()).unwrap();
        assert_eq!(desc.nets.len(), 1);
        assert_eq!(desc.nets[0].sinks, vec![1]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse("/nonexistent/netlist.txt").is_err());
    }
}
