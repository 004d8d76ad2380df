//! Secuencia perezosa de combinaciones (fase *repeat/emit*).
//!
//! La primera llamada a `next` ejecuta expand/combine; las siguientes sólo
//! re-emiten borradores. Orden: repetición exterior, borrador interior. La
//! cancelación se comprueba antes de cada entrega y corta la secuencia sin
//! emitir nada más.

use futures::stream::{self, Stream};
use log::debug;

use super::assembler::{Assembler, Draft};
use crate::model::TestDataCombination;

enum State {
    Pending(Box<Assembler>),
    Emitting { drafts: Vec<Draft>, repeat_count: u32, repeat: u32, cursor: usize, cancel: crate::cancel::CancellationToken },
    Done,
}

pub struct CombinationStream {
    state: State,
}

impl CombinationStream {
    pub(crate) fn new(assembler: Assembler) -> Self { Self { state: State::Pending(Box::new(assembler)) } }

    /// Siguiente combinación, o `None` al terminar (o tras cancelación).
    pub async fn next(&mut self) -> Option<TestDataCombination> {
        loop {
            match &mut self.state {
                State::Done => return None,
                State::Pending(assembler) => {
                    let repeat_count = assembler.metadata.repeat_count(assembler.config.default_repeat);
                    let cancel = assembler.cancel.clone();
                    match assembler.assemble().await {
                        Ok(drafts) => {
                            debug!("{}.{}: {} drafts x {} repeats",
                                   assembler.metadata.class.name,
                                   assembler.metadata.method.name,
                                   drafts.len(),
                                   repeat_count + 1);
                            self.state = State::Emitting { drafts,
                                                           repeat_count,
                                                           repeat: 0,
                                                           cursor: 0,
                                                           cancel };
                        }
                        Err(e) => {
                            debug!("combination generation stopped: {e}");
                            self.state = State::Done;
                        }
                    }
                }
                State::Emitting { drafts,
                                  repeat_count,
                                  repeat,
                                  cursor,
                                  cancel, } => {
                    if cancel.is_cancelled() {
                        self.state = State::Done;
                        continue;
                    }
                    if let Some(draft) = drafts.get(*cursor) {
                        *cursor += 1;
                        return Some(draft.emit(*repeat));
                    }
                    if *repeat >= *repeat_count || drafts.is_empty() {
                        self.state = State::Done;
                    } else {
                        *repeat += 1;
                        *cursor = 0;
                    }
                }
            }
        }
    }

    /// Adaptador a `futures::Stream`.
    pub fn into_stream(self) -> impl Stream<Item = TestDataCombination> + Send {
        stream::unfold(self, |mut s| async move { s.next().await.map(|c| (c, s)) })
    }

    /// Drena la secuencia completa.
    pub async fn collect_all(mut self) -> Vec<TestDataCombination> {
        let mut out = Vec::new();
        while let Some(c) = self.next().await {
            out.push(c);
        }
        out
    }
}
