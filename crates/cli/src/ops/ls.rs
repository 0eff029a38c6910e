use clap::{ArgAction, Args};

use client::{ApiError, CancellationToken};
use common::prelude::{DirEntry, FileType, LsOptions, Path, PathError};

#[derive(Args, Debug, Clone)]
pub struct Ls {
    /// Content path to list, e.g. /ipfs/<cid> or a bare CID
    pub path: String,

    /// Resolve child types and sizes
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub resolve_children: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum LsError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("invalid path: {0}")]
    Path(#[from] PathError),
}

fn format_entry(entry: &DirEntry) -> String {
    let mut line = format!(
        "{} {:>10} {:<7} {}",
        entry.cid, entry.size, entry.file_type, entry.name
    );
    if entry.file_type == FileType::Symlink {
        line.push_str(&format!(" -> {}", entry.target));
    }
    line
}

#[async_trait::async_trait]
impl crate::op::Op for Ls {
    type Error = LsError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let path = Path::new(&self.path)?;
        let options = LsOptions::default().resolve_children(self.resolve_children);
        let cancel = CancellationToken::new();

        let (tx, rx) = flume::bounded(64);
        let unixfs = ctx.client.unixfs();
        let listing = unixfs.ls(&path, tx, options, &cancel);
        let collect = async {
            let mut lines = Vec::new();
            while let Ok(entry) = rx.recv_async().await {
                lines.push(format_entry(&entry));
            }
            lines
        };

        let (result, lines) = tokio::join!(listing, collect);
        result?;

        if lines.is_empty() {
            Ok("No entries found".to_string())
        } else {
            Ok(lines.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::prelude::decode_cid;

    #[test]
    fn test_format_entry() {
        let cid = decode_cid("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG").unwrap();
        let mut entry = DirEntry {
            name: "notes.txt".to_string(),
            cid,
            size: 1024,
            file_type: FileType::File,
            target: String::new(),
            mode: 0,
            mod_time: None,
        };
        assert_eq!(
            format_entry(&entry),
            format!("{}       1024 file    notes.txt", cid)
        );

        entry.file_type = FileType::Symlink;
        entry.target = "../other".to_string();
        assert!(format_entry(&entry).ends_with("notes.txt -> ../other"));
    }
}
