use std::path::{Path, PathBuf};

use docmark_client::DetectData;

/// 会话状态
///
/// 显式持有"最近一次文件 / 最近一次结果"，并用单调递增的请求序号
/// 防止迟到的旧响应覆盖新一次上传的结果。
#[derive(Debug, Default)]
pub struct Session {
  next_token: u64,
  current: Option<u64>,
  last_file: Option<PathBuf>,
  last_result: Option<DetectData>,
}

impl Session {
  pub fn new() -> Session {
    Session::default()
  }

  /// 开始一次新上传：发放请求序号并登记文件
  ///
  /// 新的 begin 隐式作废所有仍在途的旧请求。
  pub fn begin(&mut self, file: &Path) -> u64 {
    self.reset();
    self.next_token += 1;
    self.current = Some(self.next_token);
    self.last_file = Some(file.to_path_buf());
    self.last_result = None;
    log::debug!("[Session] 请求 #{} 开始: {}", self.next_token, file.display());
    self.next_token
  }

  /// 提交结果。序号不是最新时拒绝写入并返回 false
  pub fn complete(&mut self, token: u64, result: DetectData) -> bool {
    if self.current != Some(token) {
      log::warn!("[Session] 丢弃过期响应 #{}（当前 #{:?}）", token, self.current);
      return false;
    }
    self.last_result = Some(result);
    true
  }

  /// 原子重置全部会话状态
  pub fn reset(&mut self) {
    self.current = None;
    self.last_file = None;
    self.last_result = None;
  }

  pub fn last_result(&self) -> Option<&DetectData> {
    self.last_result.as_ref()
  }

  pub fn last_file(&self) -> Option<&Path> {
    self.last_file.as_deref()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn result_with_count(count: usize) -> DetectData {
    DetectData {
      count,
      ..DetectData::default()
    }
  }

  #[test]
  fn test_complete_accepts_newest_token() {
    let mut session = Session::new();
    let token = session.begin(Path::new("a.png"));
    assert!(session.complete(token, result_with_count(1)));
    assert_eq!(session.last_result().unwrap().count, 1);
  }

  #[test]
  fn test_stale_response_cannot_overwrite() {
    let mut session = Session::new();
    let stale = session.begin(Path::new("a.png"));
    let fresh = session.begin(Path::new("b.png"));

    assert!(session.complete(fresh, result_with_count(2)));
    // 迟到的旧响应被拒绝，b.png 的结果保持不变
    assert!(!session.complete(stale, result_with_count(1)));
    assert_eq!(session.last_result().unwrap().count, 2);
    assert_eq!(session.last_file(), Some(Path::new("b.png")));
  }

  #[test]
  fn test_begin_clears_previous_result() {
    let mut session = Session::new();
    let token = session.begin(Path::new("a.png"));
    assert!(session.complete(token, result_with_count(1)));
    session.begin(Path::new("b.png"));
    assert!(session.last_result().is_none());
  }

  #[test]
  fn test_reset_clears_everything() {
    let mut session = Session::new();
    let token = session.begin(Path::new("a.png"));
    session.complete(token, result_with_count(1));
    session.reset();
    assert!(session.last_result().is_none());
    assert!(session.last_file().is_none());
    // 重置后旧序号同样失效
    assert!(!session.complete(token, result_with_count(1)));
  }
}
