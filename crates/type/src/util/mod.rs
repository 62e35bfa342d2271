// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Rekord

pub mod hex;
