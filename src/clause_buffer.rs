//! WHERE/HAVING 子句缓冲区：拼接文本的同时记录最后写入的记号类型。
//!
//! 是否需要插入连接词只看 [`Boundary`]，不再回头匹配已生成的文本。

/// 缓冲区末尾的记号类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Boundary {
    /// 还没写入任何内容。
    #[default]
    Empty,
    /// 以子句关键字、`(` 或连接词（可带 NOT/EXISTS）结尾，下一个谓词不需要连接词。
    Open,
    /// 以完整谓词或 `)` 结尾。
    Term,
}

/// 回滚点。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mark {
    len: usize,
    boundary: Boundary,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ClauseBuffer {
    buf: String,
    boundary: Boundary,
}

impl ClauseBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.buf
    }

    /// 写入关键字或连接词。
    pub(crate) fn push_open(&mut self, word: &str) {
        self.write_leading(word);
        self.boundary = Boundary::Open;
    }

    /// 写入一个完整谓词。
    pub(crate) fn push_term(&mut self, term: &str) {
        self.write_leading(term);
        self.boundary = Boundary::Term;
    }

    pub(crate) fn open_group(&mut self) {
        self.write_leading("(");
        self.boundary = Boundary::Open;
    }

    pub(crate) fn close_group(&mut self) {
        self.buf.push(')');
        self.boundary = Boundary::Term;
    }

    pub(crate) fn mark(&self) -> Mark {
        Mark {
            len: self.buf.len(),
            boundary: self.boundary,
        }
    }

    pub(crate) fn rollback(&mut self, mark: Mark) {
        self.buf.truncate(mark.len);
        self.boundary = mark.boundary;
    }

    /// 写入 `s`；非首次写入且前面不是 `(` 时先写一个空格。
    fn write_leading(&mut self, s: &str) {
        if !self.buf.is_empty() && !self.buf.ends_with('(') {
            self.buf.push(' ');
        }
        self.buf.push_str(s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tracks_boundary() {
        let mut b = ClauseBuffer::new();
        assert_eq!(b.boundary(), Boundary::Empty);
        b.push_open("WHERE");
        assert_eq!(b.boundary(), Boundary::Open);
        b.open_group();
        b.push_term("a = ?");
        assert_eq!(b.boundary(), Boundary::Term);
        b.push_open("OR NOT");
        b.push_term("b = ?");
        b.close_group();
        assert_eq!(b.boundary(), Boundary::Term);
        assert_eq!(b.as_str(), "WHERE (a = ? OR NOT b = ?)");
    }

    #[test]
    fn rollback_restores_text_and_boundary() {
        let mut b = ClauseBuffer::new();
        b.push_open("WHERE");
        b.push_term("a = ?");
        let mark = b.mark();
        b.push_open("AND");
        b.open_group();
        b.rollback(mark);
        assert_eq!(b.as_str(), "WHERE a = ?");
        assert_eq!(b.boundary(), Boundary::Term);
        assert_eq!(b.len(), "WHERE a = ?".len());
        assert!(!b.is_empty());
    }
}
