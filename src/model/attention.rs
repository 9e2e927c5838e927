// Copyright 2019-present, the HuggingFace Inc. team, The Google AI Language Team and Facebook, Inc.
// Copyright 2019 Guillaume Becquin
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::common::dropout::{gelu, Dropout};
use std::borrow::Borrow;
use tch::{nn, Kind, Tensor};

/// Multi-head self-attention between the sentence vectors of a document.
#[derive(Debug)]
pub struct SentenceSelfAttention {
    num_heads: i64,
    head_size: i64,
    query: nn::Linear,
    key: nn::Linear,
    value: nn::Linear,
    output: nn::Linear,
    dropout: Dropout,
}

impl SentenceSelfAttention {
    pub fn new<'p, P>(p: P, hidden_size: i64, num_heads: i64, dropout: f64) -> SentenceSelfAttention
    where
        P: Borrow<nn::Path<'p>>,
    {
        let p = p.borrow();
        let linear = |name: &str| nn::linear(p / name, hidden_size, hidden_size, Default::default());

        SentenceSelfAttention {
            num_heads,
            head_size: hidden_size / num_heads,
            query: linear("linear_query"),
            key: linear("linear_keys"),
            value: linear("linear_values"),
            output: linear("final_linear"),
            dropout: Dropout::new(dropout),
        }
    }

    fn split_heads(&self, x: Tensor, bs: i64) -> Tensor {
        x.view((bs, -1, self.num_heads, self.head_size)).transpose(1, 2)
    }

    fn flatten(&self, x: Tensor, bs: i64) -> Tensor {
        x.transpose(1, 2)
            .contiguous()
            .view((bs, -1, self.num_heads * self.head_size))
    }

    /// * `hidden_states` - (*batch size*, *sentences*, *hidden size*)
    /// * `padding_mask` - (*batch size*, *sentences*), true for padded sentences
    pub fn forward_t(&self, hidden_states: &Tensor, padding_mask: &Tensor, train: bool) -> Tensor {
        let bs = hidden_states.size()[0];
        let query = self.split_heads(hidden_states.apply(&self.query), bs)
            / (self.head_size as f64).sqrt();
        let key = self.split_heads(hidden_states.apply(&self.key), bs);
        let value = self.split_heads(hidden_states.apply(&self.value), bs);

        let scores = query
            .matmul(&key.transpose(-1, -2))
            .masked_fill(&padding_mask.unsqueeze(1).unsqueeze(1), -1e18);
        let weights = scores
            .softmax(-1, Kind::Float)
            .apply_t(&self.dropout, train);
        self.flatten(weights.matmul(&value), bs).apply(&self.output)
    }
}

/// Position-wise feed-forward block with pre-layer normalization and residual connection.
#[derive(Debug)]
pub struct PositionwiseFeedForward {
    w_1: nn::Linear,
    w_2: nn::Linear,
    layer_norm: nn::LayerNorm,
    dropout_1: Dropout,
    dropout_2: Dropout,
}

impl PositionwiseFeedForward {
    pub fn new<'p, P>(p: P, hidden_size: i64, ff_size: i64, dropout: f64) -> PositionwiseFeedForward
    where
        P: Borrow<nn::Path<'p>>,
    {
        let p = p.borrow();
        let layer_norm_config = nn::LayerNormConfig {
            eps: 1e-6,
            ..Default::default()
        };
        PositionwiseFeedForward {
            w_1: nn::linear(p / "w_1", hidden_size, ff_size, Default::default()),
            w_2: nn::linear(p / "w_2", ff_size, hidden_size, Default::default()),
            layer_norm: nn::layer_norm(p / "layer_norm", vec![hidden_size], layer_norm_config),
            dropout_1: Dropout::new(dropout),
            dropout_2: Dropout::new(dropout),
        }
    }

    pub fn forward_t(&self, x: &Tensor, train: bool) -> Tensor {
        let intermediate = gelu(&x.apply(&self.layer_norm).apply(&self.w_1)).apply_t(&self.dropout_1, train);
        intermediate.apply(&self.w_2).apply_t(&self.dropout_2, train) + x
    }
}

/// Inter-sentence transformer layer. The first layer of the stack skips the input layer normalization.
#[derive(Debug)]
pub struct InterSentenceLayer {
    self_attention: SentenceSelfAttention,
    feed_forward: PositionwiseFeedForward,
    layer_norm: nn::LayerNorm,
    dropout: Dropout,
}

impl InterSentenceLayer {
    pub fn new<'p, P>(
        p: P,
        hidden_size: i64,
        num_heads: i64,
        ff_size: i64,
        dropout: f64,
    ) -> InterSentenceLayer
    where
        P: Borrow<nn::Path<'p>>,
    {
        let p = p.borrow();
        let layer_norm_config = nn::LayerNormConfig {
            eps: 1e-6,
            ..Default::default()
        };
        InterSentenceLayer {
            self_attention: SentenceSelfAttention::new(p / "self_attn", hidden_size, num_heads, dropout),
            feed_forward: PositionwiseFeedForward::new(p / "feed_forward", hidden_size, ff_size, dropout),
            layer_norm: nn::layer_norm(p / "layer_norm", vec![hidden_size], layer_norm_config),
            dropout: Dropout::new(dropout),
        }
    }

    pub fn forward_t(
        &self,
        layer_index: usize,
        inputs: &Tensor,
        padding_mask: &Tensor,
        train: bool,
    ) -> Tensor {
        let normalized = if layer_index != 0 {
            inputs.apply(&self.layer_norm)
        } else {
            inputs.shallow_clone()
        };
        let context = self
            .self_attention
            .forward_t(&normalized, padding_mask, train);
        let output = context.apply_t(&self.dropout, train) + inputs;
        self.feed_forward.forward_t(&output, train)
    }
}
