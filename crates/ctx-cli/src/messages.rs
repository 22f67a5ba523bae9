//! Localized console messages
//!
//! Two catalogs ship with the binary: English and Simplified Chinese. The
//! active [`Messages`] value is built once per invocation and passed to
//! whatever prints.

use std::fmt::Display;

/// Supported message languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    SimplifiedChinese,
}

impl Language {
    /// Map a locale code such as `zh_CN.UTF-8` or `en-US` to a language.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.split('.').next().unwrap_or_default().trim();
        match code {
            "zh" | "zh-CN" | "zh_CN" | "zh-Hans" | "zh_Hans" => Some(Self::SimplifiedChinese),
            "en" | "en-US" | "en_US" | "en-GB" | "en_GB" | "C" | "POSIX" => Some(Self::English),
            _ => None,
        }
    }

    /// Pick the language from, in order: the command-line flag, the config
    /// file, `CTX_TOOL_LANG`, then `LANG`. The first non-empty value decides;
    /// anything unrecognized falls back to English.
    pub fn resolve(flag: Option<&str>, configured: &str, env: impl Fn(&str) -> Option<String>) -> Self {
        let chosen = flag
            .map(str::to_string)
            .into_iter()
            .chain(Some(configured.to_string()))
            .chain(env("CTX_TOOL_LANG"))
            .chain(env("LANG"))
            .find(|value| !value.trim().is_empty());

        chosen
            .and_then(|code| Self::from_code(&code).or_else(|| Self::from_code(code.get(..2)?)))
            .unwrap_or_default()
    }
}

/// Message catalog for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Messages {
    language: Language,
}

macro_rules! text {
    ($self:ident, $en:expr, $zh:expr) => {
        match $self.language {
            Language::English => $en,
            Language::SimplifiedChinese => $zh,
        }
    };
}

impl Messages {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    // Configuration

    pub fn legacy_config(&self, legacy: impl Display, target: impl Display) -> String {
        text!(
            self,
            format!("Using legacy config {legacy}; consider moving it to {target}"),
            format!("正在使用旧版配置 {legacy}，建议迁移至 {target}")
        )
    }

    pub fn created_default_config(&self, path: impl Display) -> String {
        text!(
            self,
            format!("Created default config at {path}"),
            format!("已在 {path} 创建默认配置")
        )
    }

    // add

    pub fn installation_scope(&self, scope: impl Display) -> String {
        text!(self, format!("Installation scope: {scope}"), format!("安装范围：{scope}"))
    }

    pub fn target_directory(&self, target: impl Display) -> String {
        text!(self, format!("Target directory: {target}"), format!("目标目录：{target}"))
    }

    pub fn cloning_repository(&self, url: &str, branch: &str) -> String {
        text!(
            self,
            format!("Cloning {url} (branch {branch})..."),
            format!("正在克隆 {url}（分支 {branch}）...")
        )
    }

    pub fn repository_cloned(&self, path: impl Display) -> String {
        text!(
            self,
            format!("Repository cloned to {path}"),
            format!("仓库已克隆到 {path}")
        )
    }

    pub fn using_local_source(&self, path: impl Display) -> String {
        text!(
            self,
            format!("Using local source {path}"),
            format!("使用本地源目录 {path}")
        )
    }

    pub fn source_not_a_directory(&self, path: impl Display) -> String {
        text!(
            self,
            format!("Source {path} is not a directory"),
            format!("源 {path} 不是目录")
        )
    }

    pub fn syncing_all(&self) -> String {
        text!(self, "Syncing all allowed directories...", "正在同步所有允许的目录...").to_string()
    }

    pub fn syncing_directory(&self, dir: &str) -> String {
        text!(self, format!("Syncing {dir}"), format!("正在同步 {dir}"))
    }

    pub fn directory_not_found(&self, dir: &str) -> String {
        text!(
            self,
            format!("Directory {dir} not found in source, skipping"),
            format!("源中未找到目录 {dir}，已跳过")
        )
    }

    pub fn installed(&self, path: impl Display) -> String {
        text!(self, format!("Installed {path}"), format!("已安装 {path}"))
    }

    pub fn backed_up(&self, path: impl Display, backup: impl Display) -> String {
        text!(
            self,
            format!("Installed {path} (previous version saved as {backup})"),
            format!("已安装 {path}（旧版本已备份为 {backup}）")
        )
    }

    pub fn skipped_identical(&self, path: impl Display) -> String {
        text!(
            self,
            format!("Unchanged {path}"),
            format!("未变化 {path}")
        )
    }

    pub fn sync_failed(&self, path: impl Display, error: impl Display) -> String {
        text!(
            self,
            format!("Failed to install {path}: {error}"),
            format!("安装 {path} 失败：{error}")
        )
    }

    pub fn installation_complete(&self) -> String {
        text!(self, "Installation complete", "安装完成").to_string()
    }

    pub fn tracking_file_saved(&self, path: impl Display) -> String {
        text!(
            self,
            format!("Tracking file saved: {path}"),
            format!("跟踪文件已保存：{path}")
        )
    }

    pub fn files_tracked(&self, count: usize) -> String {
        text!(
            self,
            format!("{count} {} tracked", plural(count, "file", "files")),
            format!("共跟踪 {count} 个文件")
        )
    }

    pub fn sync_summary(&self, installed: usize, skipped: usize, backed_up: usize) -> String {
        text!(
            self,
            format!("{installed} installed, {skipped} unchanged, {backed_up} backed up"),
            format!("安装 {installed} 个，未变化 {skipped} 个，备份 {backed_up} 个")
        )
    }

    // remove

    pub fn removal_scope(&self, scope: impl Display) -> String {
        text!(self, format!("Removal scope: {scope}"), format!("移除范围：{scope}"))
    }

    pub fn tracking_file(&self, path: impl Display) -> String {
        text!(self, format!("Tracking file: {path}"), format!("跟踪文件：{path}"))
    }

    pub fn no_tracking_file(&self, path: impl Display) -> String {
        text!(
            self,
            format!("No tracking file found at {path}; nothing was installed here"),
            format!("未找到跟踪文件 {path}，此处没有安装记录")
        )
    }

    pub fn nothing_to_remove(&self) -> String {
        text!(self, "No tracked files, nothing to remove", "没有跟踪的文件，无需移除").to_string()
    }

    pub fn found_tracked_files(&self, count: usize) -> String {
        text!(
            self,
            format!("Found {count} tracked {}:", plural(count, "file", "files")),
            format!("找到 {count} 个跟踪的文件：")
        )
    }

    pub fn confirm_removal(&self) -> String {
        text!(
            self,
            "Remove these files?",
            "确定要移除这些文件吗？"
        )
        .to_string()
    }

    pub fn removal_cancelled(&self) -> String {
        text!(self, "Removal cancelled", "已取消移除").to_string()
    }

    pub fn removed(&self, path: impl Display) -> String {
        text!(self, format!("Removed {path}"), format!("已移除 {path}"))
    }

    pub fn already_removed(&self, path: impl Display) -> String {
        text!(
            self,
            format!("Skipped {path} (already removed)"),
            format!("跳过 {path}（已被移除）")
        )
    }

    pub fn removal_failed(&self, path: impl Display, error: impl Display) -> String {
        text!(
            self,
            format!("Failed to remove {path}: {error}"),
            format!("移除 {path} 失败：{error}")
        )
    }

    pub fn pruned_directory(&self, path: impl Display) -> String {
        text!(
            self,
            format!("Removed empty directory {path}"),
            format!("已删除空目录 {path}")
        )
    }

    pub fn tracking_file_removed(&self) -> String {
        text!(
            self,
            "Removed tracking file (no files left to track)",
            "已删除跟踪文件（没有剩余的跟踪文件）"
        )
        .to_string()
    }

    pub fn removal_complete(&self) -> String {
        text!(self, "Removal complete", "移除完成").to_string()
    }

    pub fn files_removed(&self, count: usize) -> String {
        text!(
            self,
            format!("{count} {} removed", plural(count, "file", "files")),
            format!("已移除 {count} 个文件")
        )
    }

    pub fn files_failed(&self, count: usize) -> String {
        text!(
            self,
            format!("{count} {} could not be removed and remain tracked", plural(count, "file", "files")),
            format!("{count} 个文件无法移除，仍在跟踪中")
        )
    }

    // status

    pub fn no_installation(&self, path: impl Display) -> String {
        text!(
            self,
            format!("Nothing installed (no tracking file at {path})"),
            format!("尚未安装（{path} 处没有跟踪文件）")
        )
    }

    pub fn installed_at(&self, timestamp: impl Display) -> String {
        text!(self, format!("Installed at: {timestamp}"), format!("安装时间：{timestamp}"))
    }

    pub fn base_path(&self, path: impl Display) -> String {
        text!(self, format!("Base path: {path}"), format!("基础路径：{path}"))
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
